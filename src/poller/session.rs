//! One polling session: a background task that checks a single task's status
//! on a fixed cadence until it reaches a terminal state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::render::{DisplayState, render};
use super::{ProgressView, TaskApi};
use crate::client::{TaskStatus, TaskStatusSnapshot};

/// How a polling session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed(DisplayState),
    Failed(DisplayState),
    /// A status check failed; the message was shown in the error panel
    Aborted(String),
    /// Stopped before reaching a terminal state
    Cancelled,
}

/// Handle to a running polling session.
///
/// Stopping cancels the timer and any status request still in flight, so a late
/// answer never reaches the view. The cancellation check and the view updates
/// that follow it run under `gate`, which `stop` also takes: once `stop`
/// returns, nothing more is drawn.
#[derive(Debug)]
pub struct PollSession {
    task_id: String,
    cancel: CancellationToken,
    gate: Arc<Mutex<()>>,
    handle: JoinHandle<SessionOutcome>,
}

impl PollSession {
    /// Starts polling right away: the first check fires immediately, the next
    /// ones every `every`.
    pub fn spawn(
        api: Arc<dyn TaskApi>,
        view: Arc<dyn ProgressView>,
        task_id: impl Into<String>,
        every: Duration,
    ) -> Self {
        let task_id = task_id.into();
        let cancel = CancellationToken::new();
        let gate = Arc::new(Mutex::new(()));
        let handle = tokio::spawn(drive(
            api,
            view,
            task_id.clone(),
            every,
            cancel.clone(),
            gate.clone(),
        ));

        Self {
            task_id,
            cancel,
            gate,
            handle,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Cancels the session. Calling it again has no effect.
    /// Waits for a view update already under way to finish.
    pub fn stop(&self) {
        let _gate = lock(&self.gate);
        if !self.cancel.is_cancelled() {
            debug!(task_id = %self.task_id, "Stopping polling session");
            self.cancel.cancel();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.handle.is_finished()
    }

    /// Waits for the session to end
    pub async fn finished(&mut self) -> SessionOutcome {
        match (&mut self.handle).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => SessionOutcome::Cancelled,
            Err(e) => {
                warn!(task_id = %self.task_id, error = %e, "Polling task panicked");
                SessionOutcome::Aborted(e.to_string())
            }
        }
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        let _gate = lock(&self.gate);
        self.cancel.cancel();
    }
}

fn lock(gate: &Mutex<()>) -> MutexGuard<'_, ()> {
    gate.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn drive(
    api: Arc<dyn TaskApi>,
    view: Arc<dyn ProgressView>,
    task_id: String,
    every: Duration,
    cancel: CancellationToken,
    gate: Arc<Mutex<()>>,
) -> SessionOutcome {
    let mut ticker = time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut attempt: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return SessionOutcome::Cancelled,
            _ = ticker.tick() => {}
        }

        attempt += 1;
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(task_id = %task_id, attempt, "Discarding in-flight status request");
                return SessionOutcome::Cancelled;
            }
            result = api.task_status(&task_id) => result,
        };

        let finished = {
            let _gate = lock(&gate);
            if cancel.is_cancelled() {
                return SessionOutcome::Cancelled;
            }
            show(view.as_ref(), &task_id, attempt, fetched)
        };

        if let Some(outcome) = finished {
            return outcome;
        }
    }
}

/// Draws one status answer. Returns the outcome once the session is over.
fn show(
    view: &dyn ProgressView,
    task_id: &str,
    attempt: u64,
    fetched: crate::client::Result<TaskStatusSnapshot>,
) -> Option<SessionOutcome> {
    let snapshot = match fetched {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(task_id, attempt, error = %e, "Status check failed, polling stopped");
            let message = e.to_string();
            view.show_error(&message);
            view.set_form_disabled(false);
            return Some(SessionOutcome::Aborted(message));
        }
    };

    debug!(task_id, attempt, status = ?snapshot.status, progress = snapshot.percent(), "Status received");

    let state = render(task_id, &snapshot);
    view.render(&state);

    match snapshot.status {
        TaskStatus::Completed => {
            info!(task_id, attempt, "Download completed");
            view.set_form_disabled(false);
            Some(SessionOutcome::Completed(state))
        }
        TaskStatus::Failed => {
            info!(task_id, attempt, error = ?state.error, "Download failed");
            if let Some(error) = &state.error {
                view.show_error(error);
            }
            view.set_form_disabled(false);
            Some(SessionOutcome::Failed(state))
        }
        TaskStatus::Pending
        | TaskStatus::Downloading
        | TaskStatus::Processing
        | TaskStatus::Unknown => None,
    }
}
