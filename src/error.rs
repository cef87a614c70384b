use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Git command failed: {0}")]
    GitCommandError(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
