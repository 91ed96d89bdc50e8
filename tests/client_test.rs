mod common;

use serde_json::json;
use std::sync::Arc;

use common::{Backend, start_mock_service, unreachable_service};
use tubefetch::client::{
    ApiClient, ClientError, DownloadRequest, Format, HttpConfig, POLL_FAILURE, Quality,
    SUBMISSION_FALLBACK, TaskStatus,
};

fn client(base_url: String) -> ApiClient {
    ApiClient::new(&HttpConfig {
        base_url,
        ..HttpConfig::default()
    })
    .expect("valid base url")
}

fn mp3_request() -> DownloadRequest {
    DownloadRequest {
        url: "https://youtu.be/xyz".to_string(),
        format: Format::Mp3,
        quality: None,
    }
}

#[tokio::test]
async fn test_health_ok() {
    let base = start_mock_service(Arc::new(Backend::healthy())).await;

    let health = client(base).health().await.unwrap();
    assert_eq!(health.status.as_deref(), Some("healthy"));
}

#[tokio::test]
async fn test_health_failure_is_reported() {
    let base = start_mock_service(Arc::new(Backend::default())).await;

    let err = client(base).health().await.unwrap_err();
    assert!(matches!(err, ClientError::HealthCheck(ref reason) if reason.contains("503")));
}

#[tokio::test]
async fn test_create_download_sends_contract_body() {
    let backend = Arc::new(Backend::with_task("t1"));
    let base = start_mock_service(backend.clone()).await;
    let api = client(base);

    let accepted = api.create_download(&mp3_request()).await.unwrap();
    assert_eq!(accepted.task_id, "t1");
    assert_eq!(accepted.status, Some(TaskStatus::Pending));
    assert!(accepted.created_at.is_some());

    let mp4 = DownloadRequest {
        format: Format::Mp4,
        quality: Some(Quality::P480),
        ..mp3_request()
    };
    api.create_download(&mp4).await.unwrap();

    let created = backend.created();
    assert_eq!(
        created[0],
        json!({"url": "https://youtu.be/xyz", "format": "mp3"})
    );
    assert_eq!(
        created[1],
        json!({"url": "https://youtu.be/xyz", "format": "mp4", "quality": "480"})
    );
}

#[tokio::test]
async fn test_rejected_submission_carries_detail() {
    let backend = Arc::new(Backend {
        reject: Some((500, json!({"detail": "Error starting download: bad url"}))),
        ..Backend::healthy()
    });
    let base = start_mock_service(backend).await;

    let err = client(base).create_download(&mp3_request()).await.unwrap_err();
    assert!(
        matches!(err, ClientError::Submission(ref detail) if detail == "Error starting download: bad url")
    );
}

#[tokio::test]
async fn test_rejected_submission_without_string_detail_uses_fallback() {
    let backend = Arc::new(Backend {
        reject: Some((
            422,
            json!({"detail": [{"loc": ["body", "format"], "msg": "invalid"}]}),
        )),
        ..Backend::healthy()
    });
    let base = start_mock_service(backend).await;

    let err = client(base).create_download(&mp3_request()).await.unwrap_err();
    assert_eq!(err.to_string(), SUBMISSION_FALLBACK);
}

#[tokio::test]
async fn test_unreachable_service() {
    let api = client(unreachable_service().await);

    let err = api.create_download(&mp3_request()).await.unwrap_err();
    assert!(matches!(err, ClientError::Submission(ref detail) if detail == SUBMISSION_FALLBACK));

    let err = api.task_status("t1").await.unwrap_err();
    assert!(matches!(err, ClientError::Poll(ref message) if message == POLL_FAILURE));

    assert!(matches!(
        api.health().await.unwrap_err(),
        ClientError::HealthCheck(_)
    ));
}

#[tokio::test]
async fn test_task_status_parses_snapshot() {
    let backend = Arc::new(Backend::healthy());
    backend.push_status(
        200,
        json!({
            "task_id": "t1",
            "status": "completed",
            "progress": 100.0,
            "message": "Download finished",
            "created_at": "2025-12-15T10:30:00",
            "completed_at": "2025-12-15T10:32:15",
            "file_name": "t1_Song.mp3",
            "error": null
        }),
    );
    let base = start_mock_service(backend.clone()).await;

    let snapshot = client(base).task_status("t1").await.unwrap();
    assert_eq!(snapshot.status, TaskStatus::Completed);
    assert_eq!(snapshot.percent(), 100);
    assert_eq!(snapshot.file_name.as_deref(), Some("t1_Song.mp3"));
    assert_eq!(backend.status_hits(), vec!["t1".to_string()]);
}

#[tokio::test]
async fn test_task_status_failures_are_indistinguishable() {
    let backend = Arc::new(Backend::healthy());
    backend.push_status(500, json!({"detail": "boom"}));
    backend.push_status(200, json!({"progress": "not a snapshot"}));
    let base = start_mock_service(backend.clone()).await;
    let api = client(base);

    for _ in 0..3 {
        let err = api.task_status("t1").await.unwrap_err();
        assert!(matches!(err, ClientError::Poll(ref message) if message == POLL_FAILURE));
    }
    assert_eq!(backend.status_hits().len(), 3);
}

#[tokio::test]
async fn test_video_info() {
    let base = start_mock_service(Arc::new(Backend::healthy())).await;
    let api = client(base);

    let info = api
        .video_info("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .await
        .unwrap();
    assert_eq!(info.title.as_deref(), Some("Never Gonna Give You Up"));
    assert_eq!(info.duration_string.as_deref(), Some("3:33"));

    let err = api.video_info("https://youtu.be/missing").await.unwrap_err();
    assert!(matches!(err, ClientError::Preview(_)));
}

#[tokio::test]
async fn test_fetch_file() {
    let base = start_mock_service(Arc::new(Backend::healthy())).await;
    let api = client(base.clone());

    let bytes = api.fetch_file("t1").await.unwrap();
    assert_eq!(&bytes[..], b"file-bytes-for-t1");
    assert_eq!(
        api.file_url("t1").unwrap().as_str(),
        format!("{}/download/file/t1", base)
    );
}
