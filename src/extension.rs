use tracing::{debug, info, instrument};

use crate::commands::{CommandId, CommandRegistry};
use crate::error::{Error, Result};
use crate::git::Repository;
use crate::host::Host;
use crate::types::{CommandOutcome, PrefixMatch};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Folder matching rule used by `unstageFolder`
    pub prefix_match: PrefixMatch,
}

/// State shared by every command handler for the lifetime of an activation.
pub struct ExtensionContext<R, H> {
    repository: Option<R>,
    host: H,
    options: Options,
}

impl<R: Repository, H: Host> ExtensionContext<R, H> {
    /// The repository selected at activation, if any.
    #[must_use]
    pub const fn repository(&self) -> Option<&R> {
        self.repository.as_ref()
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub const fn options(&self) -> Options {
        self.options
    }
}

/// An activated set of context-menu commands.
///
/// Commands are registered by [`Extension::activate`] and unregistered by
/// [`Extension::deactivate`] or when the value is dropped.
pub struct Extension<R: Repository, H: Host> {
    context: ExtensionContext<R, H>,
    commands: CommandRegistry<R, H>,
}

impl<R: Repository, H: Host> Extension<R, H> {
    /// Builds the context and registers every command.
    ///
    /// Only the first repository yielded by `repositories` is kept. It is not
    /// re-resolved for the lifetime of the extension.
    #[instrument(skip_all, fields(prefix_match = ?options.prefix_match))]
    pub fn activate(repositories: impl IntoIterator<Item = R>, host: H, options: Options) -> Self {
        let repository = repositories.into_iter().next();
        debug!(has_repository = repository.is_some(), "Activating");

        let commands = CommandRegistry::with_defaults();
        info!(commands = commands.len(), "git-context-menu is now active");

        Self {
            context: ExtensionContext {
                repository,
                host,
                options,
            },
            commands,
        }
    }

    #[must_use]
    pub const fn context(&self) -> &ExtensionContext<R, H> {
        &self.context
    }

    /// Ids of the commands currently registered.
    #[must_use]
    pub fn command_ids(&self) -> Vec<CommandId> {
        self.commands.ids()
    }

    /// Runs a command by its id (bare, e.g. `addFile`, or namespaced).
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown or not registered, or if the
    /// underlying repository operation fails
    pub fn execute(&self, command: &str, path: Option<&str>) -> Result<CommandOutcome> {
        self.execute_id(command.parse()?, path)
    }

    /// Runs a registered command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is not registered or if the
    /// underlying repository operation fails
    #[instrument(skip(self))]
    pub fn execute_id(&self, id: CommandId, path: Option<&str>) -> Result<CommandOutcome> {
        let handler = self
            .commands
            .get(id)
            .ok_or_else(|| Error::UnknownCommand(id.to_string()))?;
        let outcome = handler(&self.context, path)?;
        debug!(outcome = ?outcome, "Command finished");
        Ok(outcome)
    }

    /// Unregisters every command and releases the repository and host.
    pub fn deactivate(mut self) {
        debug!("Deactivating");
        self.commands.dispose();
    }
}

impl<R: Repository, H: Host> Drop for Extension<R, H> {
    fn drop(&mut self) {
        if !self.commands.is_empty() {
            self.commands.dispose();
        }
    }
}
