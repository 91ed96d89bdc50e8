//! Task submission, status polling and progress rendering.
//!
//! The [`Poller`] tracks at most one task at a time. Submitting validates the
//! form, creates the task through a [`TaskApi`], then starts a [`PollSession`]
//! that renders every status answer into a [`ProgressView`] until the task
//! completes or fails. A failed status check ends the session right away; it is
//! not retried and the user has to submit again.

pub mod render;
mod session;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::client::{
    ApiClient, DownloadAccepted, DownloadForm, DownloadRequest, Result, TaskStatusSnapshot,
    validate_form,
};

pub use render::{Badge, DisplayState, DownloadAction, display_file_name, render};
pub use session::{PollSession, SessionOutcome};

/// Default gap between two status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// The two service calls the poller depends on
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn create_download(&self, request: &DownloadRequest) -> Result<DownloadAccepted>;

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusSnapshot>;
}

#[async_trait]
impl TaskApi for ApiClient {
    async fn create_download(&self, request: &DownloadRequest) -> Result<DownloadAccepted> {
        ApiClient::create_download(self, request).await
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusSnapshot> {
        ApiClient::task_status(self, task_id).await
    }
}

/// Where task progress is drawn
pub trait ProgressView: Send + Sync {
    /// Reveals the progress panel for a freshly created task
    fn show_progress(&self, task_id: &str);

    fn hide_progress(&self);

    fn render(&self, state: &DisplayState);

    fn show_error(&self, message: &str);

    fn hide_error(&self);

    /// Locks or unlocks the submission form
    fn set_form_disabled(&self, disabled: bool);
}

/// Returned by a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub task_id: String,
}

pub struct Poller {
    api: Arc<dyn TaskApi>,
    view: Arc<dyn ProgressView>,
    interval: Duration,
    session: Option<PollSession>,
}

impl Poller {
    pub fn new(api: Arc<dyn TaskApi>, view: Arc<dyn ProgressView>, interval: Duration) -> Self {
        Self {
            api,
            view,
            interval,
            session: None,
        }
    }

    /// Validates the form, creates the task and starts polling it.
    ///
    /// Validation problems never reach the network. Every error is also shown
    /// in the view's error panel.
    pub async fn submit(&mut self, form: &DownloadForm) -> Result<TaskHandle> {
        self.view.hide_error();
        self.stop_polling();
        self.view.hide_progress();

        let request = match validate_form(form) {
            Ok(request) => request,
            Err(e) => {
                self.view.show_error(&e.to_string());
                return Err(e.into());
            }
        };

        info!(url = %request.url, format = %request.format, quality = ?request.quality, "Submitting download");
        self.view.set_form_disabled(true);

        let accepted = match self.api.create_download(&request).await {
            Ok(accepted) => accepted,
            Err(e) => {
                self.view.show_error(&e.to_string());
                self.view.set_form_disabled(false);
                return Err(e);
            }
        };

        let handle = TaskHandle {
            task_id: accepted.task_id,
        };
        info!(task_id = %handle.task_id, "Download task created");

        self.view.show_progress(&handle.task_id);
        self.view
            .render(&render(&handle.task_id, &TaskStatusSnapshot::initial()));
        self.start_polling(&handle.task_id);

        Ok(handle)
    }

    /// Starts a new session for `task_id`, replacing any running one
    pub fn start_polling(&mut self, task_id: &str) {
        self.stop_polling();
        self.session = Some(PollSession::spawn(
            self.api.clone(),
            self.view.clone(),
            task_id,
            self.interval,
        ));
    }

    /// One status check outside of any session
    pub async fn poll(&self, task_id: &str) -> Result<TaskStatusSnapshot> {
        self.api.task_status(task_id).await
    }

    /// Stops the current session, if any
    pub fn stop_polling(&mut self) {
        if let Some(session) = self.session.take() {
            session.stop();
        }
    }

    /// The running session. A session that ended on its own is no longer
    /// reported, even before [`Poller::wait`] collects its outcome.
    pub fn session(&self) -> Option<&PollSession> {
        self.session.as_ref().filter(|session| !session.is_stopped())
    }

    pub fn tracked_task(&self) -> Option<&str> {
        self.session().map(PollSession::task_id)
    }

    /// Waits for the current session to end. `None` when nothing is tracked.
    pub async fn wait(&mut self) -> Option<SessionOutcome> {
        let session = self.session.as_mut()?;
        let outcome = session.finished().await;
        self.session = None;
        Some(outcome)
    }

    /// Back to a blank form: stop polling and clear every panel
    pub fn reset(&mut self) {
        self.stop_polling();
        self.view.hide_error();
        self.view.hide_progress();
        self.view.set_form_disabled(false);
    }
}
