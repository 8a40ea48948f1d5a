//! Error types for the directory client

use thiserror::Error;

/// Errors that can occur when talking to the directory service
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The service answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Nothing to search for
    #[error("No question provided")]
    EmptyQuestion,

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DirectoryError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DirectoryError::Api { status: 401, .. })
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
