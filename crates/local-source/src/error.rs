//! Errors reported by anime sources.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SourceError {
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;
