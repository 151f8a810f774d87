//! Error types for the data-access layer
//!
//! Provides unified error handling using thiserror.
//!
//! A cache miss is not an error anywhere in this crate: cache reads return
//! `Option` and only failing computations surface as `QueryError`.

use thiserror::Error;

// == Query Error Enum ==
/// Unified error type for query execution and memoized computations.
///
/// The enum is `Clone` so that a single failed in-flight computation can be
/// observed by every concurrent caller attached to it.
#[derive(Error, Debug, Clone)]
pub enum QueryError {
    /// An attempt did not complete before its deadline
    #[error("operation timed out after {0} ms")]
    Timeout(u64),

    /// The wrapped computation or data-source call failed
    #[error("{0}")]
    Computation(String),

    /// Every retry attempt failed; carries the last underlying error
    #[error("exhausted {attempts} attempts, last error: {last}")]
    RetriesExhausted {
        /// Total attempts made (first attempt included)
        attempts: u32,
        /// The error from the final attempt, unmodified in kind
        last: Box<QueryError>,
    },
}

impl QueryError {
    /// Builds a `Computation` error from any displayable failure.
    pub fn computation(message: impl Into<String>) -> Self {
        QueryError::Computation(message.into())
    }

    /// True when the error is retryable by the query executor.
    ///
    /// Timeouts and computation failures are retryable; an already
    /// retry-exhausted error is terminal.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, QueryError::RetriesExhausted { .. })
    }
}

// == Result Type Alias ==
/// Convenience Result type for the data-access layer.
pub type Result<T> = std::result::Result<T, QueryError>;
