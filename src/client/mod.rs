//! Client side of the download service contract

mod error;
pub mod http;
pub mod models;
mod validation;

pub use error::{ClientError, FormError, POLL_FAILURE, Result, SUBMISSION_FALLBACK};
pub use http::{ApiClient, HttpConfig};
pub use models::{
    DownloadAccepted, DownloadRequest, Format, Quality, TaskStatus, TaskStatusSnapshot, VideoInfo,
};
pub use validation::{DownloadForm, is_previewable, validate_form};
