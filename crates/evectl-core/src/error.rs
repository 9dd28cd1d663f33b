//! Errors returned through the client port

use thiserror::Error;

/// Errors a client port implementation can return.
///
/// `Clone` so the mock client can hand out canned copies of the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: String, name: String },

    #[error("{0}")]
    Backend(String),
}

impl ClientError {
    pub fn not_found(kind: &str, name: &str) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    /// True when the error means the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
