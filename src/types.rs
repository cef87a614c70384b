use serde::Serialize;

/// A pending index change as reported by the repository backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Absolute filesystem path of the changed file
    pub path: String,
}

impl ChangeRecord {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    File,
    Folder,
}

/// The file or folder a command was invoked on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: String,
    pub mode: TargetMode,
}

impl Target {
    #[must_use]
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: TargetMode::File,
        }
    }

    #[must_use]
    pub fn folder(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: TargetMode::Folder,
        }
    }
}

/// How a folder target is matched against change paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrefixMatch {
    /// Plain string prefix: `/a/b` also matches `/a/bc.txt`.
    #[default]
    Literal,
    /// Prefix must end on a path separator.
    SegmentBoundary,
}

/// A file pinned to a revision, e.g. `HEAD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionUri {
    pub path: String,
    pub revision: String,
}

/// A request for the host to show a two-sided diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffView {
    pub title: String,
    pub left: RevisionUri,
    pub right: String,
    pub preview: bool,
    /// Unified patch between `left` and `right`
    pub patch: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Information,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// What a command ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Repository or path missing; nothing happened.
    Skipped,
    Added { path: String },
    Unstaged { path: String },
    NothingToUnstage { path: String },
    DiffShown { view: DiffView },
}
