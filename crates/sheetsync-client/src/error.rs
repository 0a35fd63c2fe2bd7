use thiserror::Error;

/// Errors from the HTTP client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}
