//! Wire models for the download service.
//!
//! The service exposes a small JSON contract:
//! - `POST /download` accepts a [`DownloadRequest`] and answers with [`DownloadAccepted`]
//! - `GET /download/status/{task_id}` returns a [`TaskStatusSnapshot`]
//! - `GET /download/info?url=...` returns [`VideoInfo`] for the preview panel
//! - `GET /health` returns [`HealthResponse`]
//!
//! A status payload looks like:
//!
//! ```json
//! {
//!   "task_id": "550e8400-e29b-41d4-a716-446655440000",
//!   "status": "completed",
//!   "progress": 100.0,
//!   "message": "Download finished",
//!   "created_at": "2025-12-15T10:30:00",
//!   "completed_at": "2025-12-15T10:32:15",
//!   "file_name": "550e8400-e29b-41d4-a716-446655440000_Song.mp3"
//! }
//! ```
//!
//! Parsing is lenient where the service is loose: progress may be an integer or a float,
//! timestamps may or may not carry an offset, and unknown statuses map to
//! [`TaskStatus::Unknown`].

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown format '{0}', expected mp3 or mp4")]
    UnknownFormat(String),
    #[error("unknown quality '{0}', expected 360, 480, 720, 1080 or best")]
    UnknownQuality(String),
}

/// Output container requested from the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Mp3,
    Mp4,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Mp3 => "mp3",
            Format::Mp4 => "mp4",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp3" => Ok(Format::Mp3),
            "mp4" => Ok(Format::Mp4),
            other => Err(ParseError::UnknownFormat(other.to_string())),
        }
    }
}

/// Video quality, only meaningful for [`Format::Mp4`].
///
/// Serialized as a string. Deserializing also takes a bare number, which is how
/// `1080` arrives from a parsed environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quality {
    #[serde(rename = "360")]
    P360,
    #[serde(rename = "480")]
    P480,
    #[serde(rename = "720")]
    P720,
    #[serde(rename = "1080")]
    P1080,
    #[serde(rename = "best")]
    Best,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::P360 => "360",
            Quality::P480 => "480",
            Quality::P720 => "720",
            Quality::P1080 => "1080",
            Quality::Best => "best",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.trim_end_matches('p') {
            "360" => Ok(Quality::P360),
            "480" => Ok(Quality::P480),
            "720" => Ok(Quality::P720),
            "1080" => Ok(Quality::P1080),
            "best" => Ok(Quality::Best),
            _ => Err(ParseError::UnknownQuality(normalized)),
        }
    }
}

impl<'de> Deserialize<'de> for Quality {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct QualityVisitor;

        impl Visitor<'_> for QualityVisitor {
            type Value = Quality;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a quality such as \"720\", 1080 or \"best\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Quality, E> {
                value.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Quality, E> {
                self.visit_str(&value.to_string())
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Quality, E> {
                self.visit_str(&value.to_string())
            }
        }

        deserializer.deserialize_any(QualityVisitor)
    }
}

/// Body of `POST /download`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub format: Format,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadAccepted {
    pub task_id: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Server-side task state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Downloading,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskStatusSnapshot {
    #[serde(default)]
    pub task_id: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskStatusSnapshot {
    /// Placeholder shown between task creation and the first status answer
    pub fn initial() -> Self {
        Self {
            task_id: None,
            status: TaskStatus::Pending,
            progress: Some(0.0),
            message: Some("Initializing download...".to_string()),
            error: None,
            file_name: None,
            file_path: None,
            created_at: None,
            completed_at: None,
        }
    }

    /// Progress as a whole percentage, clamped to 0..=100
    pub fn percent(&self) -> u8 {
        match self.progress {
            Some(value) if value.is_finite() => value.clamp(0.0, 100.0).round() as u8,
            _ => 0,
        }
    }
}

/// Preview metadata from `GET /download/info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub duration_string: Option<String>,
    #[serde(default)]
    pub view_count_string: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
}

/// Error body returned with non-success responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorDetail {
    /// Human readable detail, only when the server sent a plain string
    pub fn message(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|detail| !detail.is_empty())
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

/// Parses RFC 3339, falling back to a naive ISO-8601 timestamp taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}
