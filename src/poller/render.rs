//! Status snapshot to display state mapping

use chrono::TimeDelta;
use std::path::Path;

use crate::client::{TaskStatus, TaskStatusSnapshot};

const COMPLETED_MESSAGE: &str = "Download completed successfully!";

/// Status badge shown next to the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Pending,
    Downloading,
    Processing,
    Completed,
    Failed,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::Pending => "Pending",
            Badge::Downloading => "Downloading",
            Badge::Processing => "Processing",
            Badge::Completed => "Completed",
            Badge::Failed => "Error",
        }
    }
}

/// Download-file action revealed once a task completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAction {
    pub task_id: String,
    pub file_name: Option<String>,
}

/// Everything a view needs to draw one task state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub task_id: String,
    pub badge: Badge,
    pub progress: u8,
    pub message: Option<String>,
    /// Text for the error panel, only for failed tasks
    pub error: Option<String>,
    pub download: Option<DownloadAction>,
    pub elapsed: Option<TimeDelta>,
}

impl DisplayState {
    pub fn is_terminal(&self) -> bool {
        matches!(self.badge, Badge::Completed | Badge::Failed)
    }
}

/// Maps a snapshot to what should be on screen. Pure: same input, same output.
pub fn render(task_id: &str, snapshot: &TaskStatusSnapshot) -> DisplayState {
    let badge = match snapshot.status {
        TaskStatus::Pending | TaskStatus::Unknown => Badge::Pending,
        TaskStatus::Downloading => Badge::Downloading,
        TaskStatus::Processing => Badge::Processing,
        TaskStatus::Completed => Badge::Completed,
        TaskStatus::Failed => Badge::Failed,
    };

    let mut state = DisplayState {
        task_id: task_id.to_string(),
        badge,
        progress: snapshot.percent(),
        message: snapshot.message.clone(),
        error: None,
        download: None,
        elapsed: None,
    };

    match snapshot.status {
        TaskStatus::Completed => {
            let file_name = snapshot
                .file_name
                .as_deref()
                .or_else(|| snapshot.file_path.as_deref().and_then(base_name))
                .map(|name| display_file_name(task_id, name));

            let mut message = COMPLETED_MESSAGE.to_string();
            if let Some(name) = &file_name {
                message.push_str("\nFile: ");
                message.push_str(name);
            }

            state.message = Some(message);
            state.download = Some(DownloadAction {
                task_id: task_id.to_string(),
                file_name,
            });
            state.elapsed = match (snapshot.created_at, snapshot.completed_at) {
                (Some(created), Some(completed)) if completed >= created => {
                    Some(completed - created)
                }
                _ => None,
            };
        }
        TaskStatus::Failed => {
            state.error = snapshot.error.clone();
        }
        TaskStatus::Pending
        | TaskStatus::Downloading
        | TaskStatus::Processing
        | TaskStatus::Unknown => {}
    }

    state
}

/// Strips the `<task_id>_` prefix the service puts on stored file names
pub fn display_file_name(task_id: &str, file_name: &str) -> String {
    file_name
        .strip_prefix(task_id)
        .and_then(|rest| rest.strip_prefix('_'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(file_name)
        .to_string()
}

fn base_name(path: &str) -> Option<&str> {
    Path::new(path).file_name().and_then(|name| name.to_str())
}
