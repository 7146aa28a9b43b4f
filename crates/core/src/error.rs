// crates/core/src/error.rs
use thiserror::Error;

/// Errors produced while validating query input.
///
/// `NotFound` deliberately does not exist: a query that matches nothing
/// returns an empty result, never an error.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{0}")]
    InvalidArgument(String),
}

impl QueryError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type alias for the query layer.
pub type QueryResult<T> = Result<T, QueryError>;
