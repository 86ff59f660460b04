//! Common error types for Actor Finder

use thiserror::Error;

use crate::loader::LoadError;

/// Common result type for Actor Finder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Actor Finder crates
#[derive(Error, Debug)]
pub enum Error {
    /// Catalog documents could not be fetched or parsed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested actor or preset not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input (bad document source, unknown command argument)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
