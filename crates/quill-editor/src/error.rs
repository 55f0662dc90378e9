//! Session error types, mirroring the failure kinds of the REST API.

use thiserror::Error;

/// Errors surfaced by sessions and gateways.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// No or invalid credential for an action that requires one.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Authenticated, but not allowed to touch this post.
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// A required field is missing or malformed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The identifier does not resolve to a post.
    #[error("Post not found")]
    NotFound,

    /// Network or store failure; the request did not complete.
    #[error("Transient I/O failure: {0}")]
    Transient(String),
}

impl SessionError {
    /// Transient failures are the only kind worth retrying automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Transient(_))
    }
}
