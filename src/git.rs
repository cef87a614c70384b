use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::types::{ChangeRecord, RevisionUri};

/// Object id of the empty tree, the left side of diffs on an unborn branch.
const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Rewrites `/` to `separator`; git always reports paths with `/`.
fn to_native(path: &str, separator: char) -> String {
    if separator == '/' {
        path.to_string()
    } else {
        path.replace('/', &separator.to_string())
    }
}

/// Trait defining the repository operations the context-menu commands rely on
pub trait Repository {
    /// Snapshot of the changes currently staged in the index
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read
    fn index_changes(&self) -> Result<Vec<ChangeRecord>>;

    /// Stage the given paths (files or folders)
    ///
    /// # Errors
    ///
    /// Returns an error if the paths cannot be staged
    fn add(&self, paths: &[&str]) -> Result<()>;

    /// Reset the index entries of the given paths to the head revision,
    /// leaving the working tree untouched
    ///
    /// # Errors
    ///
    /// Returns an error if the paths cannot be unstaged
    fn revert(&self, paths: &[&str]) -> Result<()>;

    /// Reference to `path` as it exists at `revision`
    fn to_git_uri(&self, path: &str, revision: &str) -> RevisionUri {
        RevisionUri {
            path: path.to_string(),
            revision: revision.to_string(),
        }
    }

    /// Unified patch between `left` and the working copy at `right`
    ///
    /// # Errors
    ///
    /// Returns an error if the diff cannot be produced
    fn diff(&self, left: &RevisionUri, right: &str) -> Result<String>;
}

impl<R: Repository + ?Sized> Repository for &R {
    fn index_changes(&self) -> Result<Vec<ChangeRecord>> {
        (**self).index_changes()
    }

    fn add(&self, paths: &[&str]) -> Result<()> {
        (**self).add(paths)
    }

    fn revert(&self, paths: &[&str]) -> Result<()> {
        (**self).revert(paths)
    }

    fn to_git_uri(&self, path: &str, revision: &str) -> RevisionUri {
        (**self).to_git_uri(path, revision)
    }

    fn diff(&self, left: &RevisionUri, right: &str) -> Result<String> {
        (**self).diff(left, right)
    }
}

/// Implementation of repository operations using the local Git CLI
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Opens the repository whose work tree contains `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotARepository`] if `path` is not inside a git work tree
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            debug!("Path is not a directory");
            return Err(Error::NotARepository(path.to_path_buf()));
        }

        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(path)
            .output()
            .map_err(|e| Error::GitCommandError(e.to_string()))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            debug!(error = %error, "Repository lookup failed");
            return Err(Error::NotARepository(path.to_path_buf()));
        }

        let root = String::from_utf8(output.stdout)
            .map(|s| PathBuf::from(to_native(s.trim(), std::path::MAIN_SEPARATOR)))
            .map_err(|e| Error::GitCommandError(e.to_string()))?;

        debug!(root = %root.display(), "Repository opened");
        Ok(Self { root })
    }

    /// Work tree root as reported by git
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run_git_command(&self, args: &[&str]) -> Result<String> {
        self.run_git_command_allowing(args, &[0])
    }

    /// Runs git, treating any exit code in `success_codes` as success.
    #[instrument(skip(self), fields(args = ?args, root = %self.root.display()))]
    fn run_git_command_allowing(&self, args: &[&str], success_codes: &[i32]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| Error::GitCommandError(e.to_string()))?;

        if !output
            .status
            .code()
            .is_some_and(|code| success_codes.contains(&code))
        {
            let error = String::from_utf8_lossy(&output.stderr);
            debug!(error = %error, "Git command failed");
            return Err(Error::GitCommandError(error.trim().to_string()));
        }

        let result =
            String::from_utf8(output.stdout).map_err(|e| Error::GitCommandError(e.to_string()))?;

        debug!(
            output_length = result.len(),
            "Git command completed successfully"
        );
        Ok(result)
    }

    /// Whether a git query exits with status 0. Only spawn failures are errors.
    fn git_succeeds(&self, args: &[&str]) -> Result<bool> {
        let status = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| Error::GitCommandError(e.to_string()))?
            .status;
        Ok(status.success())
    }

    fn has_head(&self) -> Result<bool> {
        self.git_succeeds(&["rev-parse", "--verify", "--quiet", "HEAD"])
    }

    fn is_in_index(&self, path: &str) -> Result<bool> {
        self.git_succeeds(&["ls-files", "--error-unmatch", "--", path])
    }

    fn run_with_paths(&self, args: &[&str], paths: &[&str]) -> Result<String> {
        let mut full = Vec::with_capacity(args.len() + paths.len() + 1);
        full.extend_from_slice(args);
        full.push("--");
        full.extend_from_slice(paths);
        self.run_git_command(&full)
    }
}

impl Repository for GitCli {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn index_changes(&self) -> Result<Vec<ChangeRecord>> {
        let output = self.run_git_command(&["diff", "--cached", "--name-only", "-z"])?;
        let changes: Vec<ChangeRecord> = output
            .split('\0')
            .filter(|relative| !relative.is_empty())
            .map(|relative| {
                let joined = self.root.join(relative);
                ChangeRecord::new(to_native(
                    &joined.to_string_lossy(),
                    std::path::MAIN_SEPARATOR,
                ))
            })
            .collect();

        debug!(count = changes.len(), "Index changes read");
        Ok(changes)
    }

    #[instrument(skip(self), fields(paths = ?paths))]
    fn add(&self, paths: &[&str]) -> Result<()> {
        self.run_with_paths(&["add"], paths)?;
        debug!("Paths staged");
        Ok(())
    }

    #[instrument(skip(self), fields(paths = ?paths))]
    fn revert(&self, paths: &[&str]) -> Result<()> {
        self.run_with_paths(&["reset", "-q"], paths)?;
        debug!("Paths unstaged");
        Ok(())
    }

    #[instrument(skip(self), fields(revision = %left.revision, path = %right))]
    fn diff(&self, left: &RevisionUri, right: &str) -> Result<String> {
        // Untracked files: the whole file shows as added
        if Path::new(right).is_file() && !self.is_in_index(right)? {
            debug!("Path is untracked, diffing against /dev/null");
            let patch = self.run_git_command_allowing(
                &["diff", "--no-index", "--", "/dev/null", right],
                &[0, 1],
            )?;
            debug!(patch_length = patch.len(), "Diff produced");
            return Ok(patch);
        }

        let revision = if left.revision == "HEAD" && !self.has_head()? {
            debug!("HEAD is unborn, diffing against the empty tree");
            EMPTY_TREE
        } else {
            left.revision.as_str()
        };
        let patch = self.run_with_paths(&["diff", revision], &[right])?;
        debug!(patch_length = patch.len(), "Diff produced");
        Ok(patch)
    }
}
