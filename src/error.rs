//! Error types for talking to the OpenCore backend.

use thiserror::Error;

/// Anything that can go wrong between the console and the backend.
///
/// The UI collapses every variant into a single "communication failure";
/// the variants exist for the log file.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("attachment error: {0}")]
    Attachment(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
