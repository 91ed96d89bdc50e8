//! HTTP client for the download service

use bytes::Bytes;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::error::{ClientError, POLL_FAILURE, Result, SUBMISSION_FALLBACK};
use super::models::{
    DownloadAccepted, DownloadRequest, ErrorDetail, HealthResponse, TaskStatusSnapshot, VideoInfo,
};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("tubefetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Client for the download service endpoints.
///
/// Requests carry no overall timeout: a slow status answer only delays the
/// polling cycle it belongs to.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Liveness probe (`GET /health`)
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = self.endpoint(&["health"])?;
        debug!(%url, "Checking API health");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::HealthCheck(e.to_string()))?;

        let response = ensure_success(response).map_err(ClientError::HealthCheck)?;

        response
            .json::<HealthResponse>()
            .await
            .map_err(|e| ClientError::HealthCheck(format!("Invalid health payload: {}", e)))
    }

    /// Preview metadata (`GET /download/info?url=...`)
    pub async fn video_info(&self, video_url: &str) -> Result<VideoInfo> {
        let mut url = self.endpoint(&["download", "info"])?;
        url.query_pairs_mut().append_pair("url", video_url);
        debug!(video_url, "Fetching video preview");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Preview(e.to_string()))?;

        let response = ensure_success(response).map_err(ClientError::Preview)?;

        response
            .json::<VideoInfo>()
            .await
            .map_err(|e| ClientError::Preview(format!("Invalid preview payload: {}", e)))
    }

    /// Creates a download task (`POST /download`)
    pub async fn create_download(&self, request: &DownloadRequest) -> Result<DownloadAccepted> {
        let url = self.endpoint(&["download"])?;
        debug!(url = %request.url, format = %request.format, "Creating download task");

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Download request could not be sent");
                ClientError::Submission(SUBMISSION_FALLBACK.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorDetail>()
                .await
                .unwrap_or_default();
            let message = detail
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| SUBMISSION_FALLBACK.to_string());

            warn!(status = status.as_u16(), %message, "Download request rejected");
            return Err(ClientError::Submission(message));
        }

        response.json::<DownloadAccepted>().await.map_err(|e| {
            warn!(error = %e, "Malformed download response");
            ClientError::Submission(SUBMISSION_FALLBACK.to_string())
        })
    }

    /// Current task state (`GET /download/status/{task_id}`).
    ///
    /// Every failure collapses into the same [`ClientError::Poll`].
    pub async fn task_status(&self, task_id: &str) -> Result<TaskStatusSnapshot> {
        let url = self.endpoint(&["download", "status", task_id])?;
        debug!(task_id, "Fetching task status");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(task_id, error = %e, "Status request failed");
            ClientError::Poll(POLL_FAILURE.to_string())
        })?;

        let response = ensure_success(response).map_err(|reason| {
            warn!(task_id, %reason, "Status request rejected");
            ClientError::Poll(POLL_FAILURE.to_string())
        })?;

        response.json::<TaskStatusSnapshot>().await.map_err(|e| {
            warn!(task_id, error = %e, "Malformed status payload");
            ClientError::Poll(POLL_FAILURE.to_string())
        })
    }

    /// Where the finished file can be fetched from
    pub fn file_url(&self, task_id: &str) -> Result<Url> {
        self.endpoint(&["download", "file", task_id])
    }

    /// Downloads the finished file (`GET /download/file/{task_id}`)
    pub async fn fetch_file(&self, task_id: &str) -> Result<Bytes> {
        let url = self.file_url(task_id)?;
        debug!(task_id, "Fetching finished file");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::FileDownload(e.to_string()))?;

        let response = ensure_success(response).map_err(ClientError::FileDownload)?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::FileDownload(format!("Failed to read body: {}", e)))?;

        debug!(task_id, size = bytes.len(), "File received");
        Ok(bytes)
    }
}

fn ensure_success(response: Response) -> std::result::Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ))
    }
}
