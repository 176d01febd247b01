use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tempfile::tempdir;
use tokio::net::TcpListener;

use wagon_defect_detector::api::{DetectionApiClient, DetectionOptions, HistoryQuery, Severity};
use wagon_defect_detector::error::DetectorError;
use wagon_defect_detector::upload::{ImageFormat, UploadSelection};

#[derive(Debug, Default)]
struct ReceivedUpload {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
    fields: HashMap<String, String>,
}

type Received = Arc<Mutex<Option<ReceivedUpload>>>;

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn detection_body() -> Value {
    json!({
        "inspection_id": 7,
        "filename": "wagon1.png",
        "processing_time": 1.25,
        "status": "completed",
        "detections_count": 1,
        "detections": [{
            "defect_type": "crack",
            "confidence": 0.912,
            "bounding_box": {"x": 10.0, "y": 20.0, "width": 30.0, "height": 40.0},
            "severity": "high"
        }],
        "original_image_url": "/static/uploads/wagon1.png",
        "annotated_image_url": "/static/results/wagon1_annotated.png"
    })
}

async fn upload_handler(
    State(received): State<Received>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut upload = ReceivedUpload::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            upload.file_name = field.file_name().map(str::to_string);
            upload.content_type = field.content_type().map(str::to_string);
            upload.bytes = field.bytes().await.unwrap().to_vec();
        } else {
            let text = field.text().await.unwrap_or_default();
            upload.fields.insert(name, text);
        }
    }
    *received.lock().unwrap() = Some(upload);
    Json(detection_body())
}

fn selection_for(path: &Path) -> UploadSelection {
    UploadSelection {
        id: 1,
        path: path.to_path_buf(),
        file_name: "wagon1.png".into(),
        size_bytes: std::fs::metadata(path).unwrap().len(),
        format: ImageFormat::Png,
    }
}

#[tokio::test]
async fn upload_sends_file_and_flags_as_multipart() {
    let received: Received = Arc::default();
    let router = Router::new()
        .route("/api/detection/upload-and-detect", post(upload_handler))
        .with_state(received.clone());
    let base = serve(router).await;

    let dir = tempdir().unwrap();
    let path = dir.path().join("wagon1.png");
    std::fs::write(&path, b"\x89PNG fake image").unwrap();

    let client = DetectionApiClient::new(&base).unwrap();
    let options = DetectionOptions {
        enhanced_accuracy: true,
        high_precision: false,
    };
    let response = client
        .upload_and_detect(&selection_for(&path), options)
        .await
        .unwrap();

    assert_eq!(response.inspection_id, 7);
    assert_eq!(response.detections.len(), 1);
    assert_eq!(response.detections[0].severity, Severity::High);

    let upload = received.lock().unwrap().take().unwrap();
    assert_eq!(upload.file_name.as_deref(), Some("wagon1.png"));
    assert_eq!(upload.content_type.as_deref(), Some("image/png"));
    assert_eq!(upload.bytes, b"\x89PNG fake image");
    assert_eq!(upload.fields["enhanced_accuracy"], "true");
    assert_eq!(upload.fields["high_precision"], "false");
}

#[tokio::test]
async fn server_detail_becomes_the_error_message() {
    let router = Router::new().route(
        "/api/detection/upload-and-detect",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"detail": "Unsupported image format"})),
            )
        }),
    );
    let base = serve(router).await;

    let dir = tempdir().unwrap();
    let path = dir.path().join("wagon1.png");
    std::fs::write(&path, b"png").unwrap();

    let client = DetectionApiClient::new(&base).unwrap();
    let err = client
        .upload_and_detect(&selection_for(&path), DetectionOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DetectorError::Request(ref m) if m == "Unsupported image format"));
}

#[tokio::test]
async fn status_code_is_reported_without_detail() {
    let router = Router::new().route(
        "/api/detection/model-info",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = serve(router).await;

    let client = DetectionApiClient::new(&base).unwrap();
    let err = client.get_model_info().await.unwrap_err();

    assert_eq!(err.to_string(), "Request failed with status code 500");
}

#[tokio::test]
async fn unreadable_file_fails_before_any_request() {
    let client = DetectionApiClient::new("http://127.0.0.1:9").unwrap();
    let selection = UploadSelection {
        id: 1,
        path: "/definitely/not/here.png".into(),
        file_name: "here.png".into(),
        size_bytes: 0,
        format: ImageFormat::Png,
    };

    let err = client
        .upload_and_detect(&selection, DetectionOptions::default())
        .await
        .unwrap_err();

    assert!(err.reason().starts_with("Failed to read file:"));
}

#[tokio::test]
async fn history_sends_limit_and_optional_status() {
    let router = Router::new().route(
        "/api/detection/history",
        get(|Query(params): Query<HashMap<String, String>>| async move { Json(json!(params)) }),
    );
    let base = serve(router).await;
    let client = DetectionApiClient::new(&base).unwrap();

    let defaults = client.get_history(&HistoryQuery::default()).await.unwrap();
    assert_eq!(defaults, json!({"limit": "50"}));

    let filtered = client
        .get_history(&HistoryQuery {
            limit: 5,
            status: Some("completed".into()),
        })
        .await
        .unwrap();
    assert_eq!(filtered, json!({"limit": "5", "status": "completed"}));
}

#[tokio::test]
async fn health_and_model_info_return_raw_json() {
    let router = Router::new()
        .route(
            "/api/detection/health-check",
            get(|| async { Json(json!({"status": "healthy", "model_loaded": true})) }),
        )
        .route(
            "/api/detection/model-info",
            get(|| async { Json(json!({"model_name": "yolov8", "classes": ["crack", "dent"]})) }),
        );
    let base = serve(router).await;
    let client = DetectionApiClient::new(&format!("{}/", base)).unwrap();

    let health = client.health_check().await.unwrap();
    assert_eq!(health["status"], "healthy");

    let model = client.get_model_info().await.unwrap();
    assert_eq!(model["classes"][1], "dent");
}
