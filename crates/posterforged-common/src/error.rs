//! Common error types used throughout posterforged.
//!
//! This module provides the engine-wide error taxonomy: transient fetch
//! failures, empty results, invalid pagination jumps, and expired sessions.

/// Common error type for posterforged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A provider could not be reached or returned an unusable response.
    /// Transient: callers may retry, then surface "source unavailable".
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// No poster matched the query or the active filters.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A numeric pagination jump landed outside the valid index range.
    /// The session is left unchanged.
    #[error("Index {requested} out of range (total {total})")]
    OutOfRange { requested: usize, total: usize },

    /// The session id is unknown, superseded, or its TTL has elapsed.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new Fetch error.
    pub fn fetch<S: Into<String>>(msg: S) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new SessionExpired error.
    pub fn session_expired<S: Into<String>>(msg: S) -> Self {
        Self::SessionExpired(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether retrying the same operation could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
