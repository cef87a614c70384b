pub use error::{Error, Result};
pub use extension::{Extension, ExtensionContext, Options};
pub use git::{GitCli, Repository};
pub use host::{Host, RecordingHost};
pub use lookup::is_staged;
pub use types::{
    ChangeRecord, CommandOutcome, DiffView, Notification, NotificationLevel, PrefixMatch,
    RevisionUri, Target, TargetMode,
};

use path_clean::PathClean;
use std::path::{Path, PathBuf};

pub mod commands;
mod error;
pub mod extension;
mod git;
pub mod host;
mod lookup;
mod types;

/// Activates the commands against the repositories containing `paths`.
///
/// Paths that are not inside a git work tree are skipped. Only the first
/// repository found is used by the commands.
///
/// # Errors
///
/// Returns an error if git cannot be executed at all.
pub fn activate<H: Host>(
    paths: &[&Path],
    host: H,
    options: Options,
) -> Result<Extension<GitCli, H>> {
    let mut repositories = Vec::with_capacity(paths.len());
    for path in paths {
        match GitCli::open(path) {
            Ok(repo) => repositories.push(repo),
            Err(Error::NotARepository(path)) => {
                tracing::debug!(path = %path.display(), "Skipping non-repository path");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(Extension::activate(repositories, host, options))
}

/// Resolves a command target the way an editor reports its fsPath: absolute,
/// with `.` and `..` components removed. Relative paths are taken from `base`.
#[must_use]
pub fn resolve_target(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.clean()
    } else {
        base.join(path).clean()
    }
}
