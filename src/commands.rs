use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::extension::ExtensionContext;
use crate::git::Repository;
use crate::host::{display_name, messages, Host};
use crate::lookup::is_staged;
use crate::types::{CommandOutcome, DiffView, Target};

/// Namespace the host prefixes command ids with.
pub const COMMAND_PREFIX: &str = "git-context-menu.";

/// Revision the diff view compares the working copy against.
pub const HEAD: &str = "HEAD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    AddFile,
    AddFolder,
    UnstageFile,
    UnstageFolder,
    ShowDiff,
}

impl CommandId {
    pub const ALL: [Self; 5] = [
        Self::AddFile,
        Self::AddFolder,
        Self::UnstageFile,
        Self::UnstageFolder,
        Self::ShowDiff,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddFile => "addFile",
            Self::AddFolder => "addFolder",
            Self::UnstageFile => "unstageFile",
            Self::UnstageFolder => "unstageFolder",
            Self::ShowDiff => "showDiff",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{COMMAND_PREFIX}{}", self.as_str())
    }
}

impl FromStr for CommandId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.strip_prefix(COMMAND_PREFIX).unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == name)
            .ok_or_else(|| Error::UnknownCommand(s.to_string()))
    }
}

pub type Handler<R, H> = fn(&ExtensionContext<R, H>, Option<&str>) -> Result<CommandOutcome>;

/// Command id to handler table, populated on activation.
pub struct CommandRegistry<R, H> {
    handlers: HashMap<CommandId, Handler<R, H>>,
}

impl<R: Repository, H: Host> CommandRegistry<R, H> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::with_capacity(CommandId::ALL.len()),
        }
    }

    /// Registry with every context-menu command bound to its handler.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(CommandId::AddFile, add_file);
        registry.register(CommandId::AddFolder, add_folder);
        registry.register(CommandId::UnstageFile, unstage_file);
        registry.register(CommandId::UnstageFolder, unstage_folder);
        registry.register(CommandId::ShowDiff, show_diff);
        registry
    }

    pub fn register(&mut self, id: CommandId, handler: Handler<R, H>) {
        debug!(command = %id, "Registering command");
        self.handlers.insert(id, handler);
    }

    #[must_use]
    pub fn get(&self, id: CommandId) -> Option<Handler<R, H>> {
        self.handlers.get(&id).copied()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<CommandId> {
        let mut ids: Vec<CommandId> = self.handlers.keys().copied().collect();
        ids.sort_by_key(|id| id.as_str());
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Drops every registration.
    pub fn dispose(&mut self) {
        for id in self.handlers.keys() {
            debug!(command = %id, "Unregistering command");
        }
        self.handlers.clear();
    }
}

impl<R: Repository, H: Host> Default for CommandRegistry<R, H> {
    fn default() -> Self {
        Self::new()
    }
}

#[instrument(skip(ctx))]
fn add_file<R: Repository, H: Host>(
    ctx: &ExtensionContext<R, H>,
    path: Option<&str>,
) -> Result<CommandOutcome> {
    add(ctx, path, messages::file_added)
}

#[instrument(skip(ctx))]
fn add_folder<R: Repository, H: Host>(
    ctx: &ExtensionContext<R, H>,
    path: Option<&str>,
) -> Result<CommandOutcome> {
    add(ctx, path, messages::folder_added)
}

fn add<R: Repository, H: Host>(
    ctx: &ExtensionContext<R, H>,
    path: Option<&str>,
    message: fn(&str) -> String,
) -> Result<CommandOutcome> {
    let (Some(repo), Some(path)) = (ctx.repository(), path) else {
        debug!("No repository or path, skipping add");
        return Ok(CommandOutcome::Skipped);
    };

    repo.add(&[path])?;
    ctx.host().show_information_message(&message(display_name(path)));
    Ok(CommandOutcome::Added {
        path: path.to_string(),
    })
}

#[instrument(skip(ctx))]
fn unstage_file<R: Repository, H: Host>(
    ctx: &ExtensionContext<R, H>,
    path: Option<&str>,
) -> Result<CommandOutcome> {
    unstage(
        ctx,
        path.map(Target::file),
        messages::nothing_to_unstage,
        messages::file_unstaged,
    )
}

#[instrument(skip(ctx))]
fn unstage_folder<R: Repository, H: Host>(
    ctx: &ExtensionContext<R, H>,
    path: Option<&str>,
) -> Result<CommandOutcome> {
    unstage(
        ctx,
        path.map(Target::folder),
        messages::nothing_to_unstage_in_folder,
        messages::folder_unstaged,
    )
}

fn unstage<R: Repository, H: Host>(
    ctx: &ExtensionContext<R, H>,
    target: Option<Target>,
    nothing: fn(&str) -> String,
    done: fn(&str) -> String,
) -> Result<CommandOutcome> {
    let (Some(repo), Some(target)) = (ctx.repository(), target) else {
        debug!("No repository or path, skipping unstage");
        return Ok(CommandOutcome::Skipped);
    };
    let name = display_name(&target.path);

    let changes = repo.index_changes()?;
    if !is_staged(&target, &changes, ctx.options().prefix_match) {
        debug!(path = %target.path, staged = changes.len(), "Nothing staged under target");
        ctx.host().show_warning_message(&nothing(name));
        return Ok(CommandOutcome::NothingToUnstage { path: target.path });
    }

    repo.revert(&[target.path.as_str()])?;
    ctx.host().show_information_message(&done(name));
    Ok(CommandOutcome::Unstaged { path: target.path })
}

#[instrument(skip(ctx))]
fn show_diff<R: Repository, H: Host>(
    ctx: &ExtensionContext<R, H>,
    path: Option<&str>,
) -> Result<CommandOutcome> {
    let (Some(repo), Some(path)) = (ctx.repository(), path) else {
        debug!("No repository or path, skipping diff");
        return Ok(CommandOutcome::Skipped);
    };

    let left = repo.to_git_uri(path, HEAD);
    let patch = repo.diff(&left, path)?;
    let view = DiffView {
        title: messages::diff_title(display_name(path)),
        left,
        right: path.to_string(),
        preview: true,
        patch,
    };
    ctx.host().show_diff(&view);
    Ok(CommandOutcome::DiffShown { view })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_namespaced_ids() {
        assert_eq!("addFile".parse::<CommandId>().unwrap(), CommandId::AddFile);
        assert_eq!(
            "git-context-menu.unstageFolder".parse::<CommandId>().unwrap(),
            CommandId::UnstageFolder
        );
        assert!(matches!(
            "stageAll".parse::<CommandId>(),
            Err(Error::UnknownCommand(name)) if name == "stageAll"
        ));
    }

    #[test]
    fn display_is_namespaced() {
        assert_eq!(CommandId::ShowDiff.to_string(), "git-context-menu.showDiff");
        for id in CommandId::ALL {
            assert_eq!(id.to_string().parse::<CommandId>().unwrap(), id);
        }
    }
}
