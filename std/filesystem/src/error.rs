use crate::validate::ValidateError;
use thiserror::Error;

/// Errors from file manager operations.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("File '{0}' already exists. Use write_file to update it.")]
    AlreadyExists(String),

    #[error("File '{0}' not found")]
    NotFound(String),

    #[error("File '{0}' does not exist. Use create_file to create new files.")]
    NotCreated(String),

    #[error("Directory not found")]
    DirectoryNotFound,

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error(transparent)]
    Path(#[from] ValidateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
