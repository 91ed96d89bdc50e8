use thiserror::Error;

/// Message used when the service rejects a submission without a usable detail
pub const SUBMISSION_FALLBACK: &str = "Could not start the download";

/// Message shown when a status check fails for any reason
pub const POLL_FAILURE: &str = "Could not fetch the download status";

/// Local form problems, detected before any request is sent
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter a video URL")]
    MissingUrl,
    #[error("Please select a video quality")]
    MissingQuality,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] FormError),

    #[error("{0}")]
    Submission(String),

    #[error("{0}")]
    Poll(String),

    #[error("{0}")]
    HealthCheck(String),

    #[error("preview unavailable: {0}")]
    Preview(String),

    #[error("file download failed: {0}")]
    FileDownload(String),

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
