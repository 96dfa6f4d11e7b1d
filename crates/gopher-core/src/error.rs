//! Error types for the gopher API

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GopherError>;

/// Storage-agnostic error kinds returned at the repository boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GopherError {
    #[error("Gopher not found: {0}")]
    NotFound(String),

    #[error("Gopher already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Reserved for backends that do not support an operation; none of the
    /// bundled backends return it.
    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

impl GopherError {
    pub fn backend(e: impl std::fmt::Display) -> Self {
        GopherError::Backend(e.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GopherError::NotFound(_))
    }
}
