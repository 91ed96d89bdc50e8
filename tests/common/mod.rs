//! Mock download service and a recording view shared by the integration tests

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tubefetch::poller::{DisplayState, ProgressView};
use uuid::Uuid;

/// Scripted behaviour and request log of the mock service
#[derive(Default)]
pub struct Backend {
    pub healthy: bool,
    pub task_id: Option<String>,
    /// Answer for `POST /download` instead of accepting the task
    pub reject: Option<(u16, Value)>,
    /// Answers for successive `GET /download/status/{id}` calls
    pub statuses: Mutex<VecDeque<(u16, Value)>>,
    pub created: Mutex<Vec<Value>>,
    pub status_hits: Mutex<Vec<String>>,
}

impl Backend {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            ..Self::default()
        }
    }

    pub fn with_task(task_id: &str) -> Self {
        Self {
            healthy: true,
            task_id: Some(task_id.to_string()),
            ..Self::default()
        }
    }

    pub fn push_status(&self, code: u16, body: Value) {
        self.statuses.lock().unwrap().push_back((code, body));
    }

    pub fn status_hits(&self) -> Vec<String> {
        self.status_hits.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<Value> {
        self.created.lock().unwrap().clone()
    }
}

/// Serves the backend on an ephemeral port and returns its base URL
pub async fn start_mock_service(backend: Arc<Backend>) -> String {
    let app = Router::new()
        .route("/health", get(health))
        .route("/download", post(create_download))
        .route("/download/info", get(video_info))
        .route("/download/status/{task_id}", get(task_status))
        .route("/download/file/{task_id}", get(task_file))
        .with_state(backend);

    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let bound_addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", bound_addr)
}

/// Base URL where nothing is listening
pub async fn unreachable_service() -> String {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

async fn health(State(backend): State<Arc<Backend>>) -> (StatusCode, Json<Value>) {
    if backend.healthy {
        (StatusCode::OK, Json(json!({"status": "healthy"})))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "down"})),
        )
    }
}

async fn create_download(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.created.lock().unwrap().push(body);

    if let Some((code, body)) = &backend.reject {
        return (status(*code), Json(body.clone()));
    }

    let task_id = backend
        .task_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    (
        StatusCode::ACCEPTED,
        Json(json!({
            "task_id": task_id,
            "status": "pending",
            "message": "MP3 download started",
            "created_at": "2025-12-15T10:30:00"
        })),
    )
}

async fn video_info(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    match params.get("url") {
        Some(url) if url.contains("watch?v=dQw4w9WgXcQ") => (
            StatusCode::OK,
            Json(json!({
                "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg",
                "title": "Never Gonna Give You Up",
                "uploader": "Rick Astley",
                "duration_string": "3:33",
                "view_count_string": "1.5B",
                "description": "The official video"
            })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Video not found"})),
        ),
    }
}

async fn task_status(
    State(backend): State<Arc<Backend>>,
    Path(task_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    backend.status_hits.lock().unwrap().push(task_id.clone());

    let next = backend.statuses.lock().unwrap().pop_front();
    match next {
        Some((code, body)) => (status(code), Json(body)),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": format!("Task {} not found", task_id)})),
        ),
    }
}

async fn task_file(Path(task_id): Path<String>) -> Vec<u8> {
    format!("file-bytes-for-{}", task_id).into_bytes()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    ShowProgress(String),
    HideProgress,
    Render(DisplayState),
    ShowError(String),
    HideError,
    FormDisabled(bool),
}

#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn renders(&self) -> Vec<DisplayState> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::Render(state) => Some(state),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::ShowError(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressView for RecordingView {
    fn show_progress(&self, task_id: &str) {
        self.push(ViewEvent::ShowProgress(task_id.to_string()));
    }

    fn hide_progress(&self) {
        self.push(ViewEvent::HideProgress);
    }

    fn render(&self, state: &DisplayState) {
        self.push(ViewEvent::Render(state.clone()));
    }

    fn show_error(&self, message: &str) {
        self.push(ViewEvent::ShowError(message.to_string()));
    }

    fn hide_error(&self) {
        self.push(ViewEvent::HideError);
    }

    fn set_form_disabled(&self, disabled: bool) {
        self.push(ViewEvent::FormDisabled(disabled));
    }
}
