//! Error types for uploads.

use thiserror::Error;

/// Errors that can occur when sending data to the upload service.
#[derive(Debug, Error)]
pub enum UploadError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("Upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Failed to read a document from disk.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode the request body.
    #[error("Failed to encode body: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UploadError::Timeout
        } else if err.is_connect() {
            UploadError::Connection(err.to_string())
        } else {
            UploadError::Http(err.to_string())
        }
    }
}
