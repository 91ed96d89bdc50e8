//! Startup probe of the download service

use tracing::{info, warn};

use crate::client::ApiClient;
use crate::poller::ProgressView;

/// Checks `GET /health`. A failure is shown as a warning and never blocks the
/// command that asked; the caller carries on either way.
pub async fn check_health(client: &ApiClient, view: &dyn ProgressView) -> bool {
    match client.health().await {
        Ok(health) => {
            info!(status = ?health.status, "API healthy");
            true
        }
        Err(e) => {
            warn!(error = %e, "API health check failed");
            view.show_error(&unreachable_message(client));
            false
        }
    }
}

pub fn unreachable_message(client: &ApiClient) -> String {
    format!(
        "API server is not reachable. Make sure the backend is running at {}",
        client.base_url()
    )
}
