//! Centralized error types for the content writer.

use thiserror::Error;

use crate::policy::PolicyError;

/// Main error type for content operations.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Invalid publishedDate '{value}': {source}")]
    InvalidPublishedDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Policy evaluation failed: {0}")]
    Policy(#[from] PolicyError),

    #[error("Graph store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

impl ContentError {
    /// True for errors caused by the request payload rather than a collaborator.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidPublishedDate { .. })
    }
}

/// Errors raised by a graph store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Failed to decode result row: {0}")]
    Deserialize(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Create a row decoding error.
    pub fn deserialize(msg: impl Into<String>) -> Self {
        Self::Deserialize(msg.into())
    }
}
