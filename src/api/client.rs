use crate::api::types::{DetectionOptions, DetectionResponse};
use crate::error::{DetectorError, Result};
use crate::upload::UploadSelection;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

const UPLOAD_AND_DETECT_PATH: &str = "/api/detection/upload-and-detect";
const HISTORY_PATH: &str = "/api/detection/history";
const MODEL_INFO_PATH: &str = "/api/detection/model-info";
const HEALTH_CHECK_PATH: &str = "/api/detection/health-check";

const FALLBACK_MESSAGE: &str = "Detection failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub limit: u32,
    pub status: Option<String>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            status: None,
        }
    }
}

impl HistoryQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", self.limit.to_string())];
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            params.push(("status", status.to_string()));
        }
        params
    }
}

/// Thin wrapper over the detection backend. Every call is a single attempt.
#[derive(Debug, Clone)]
pub struct DetectionApiClient {
    http: Client,
    base_url: String,
}

impl DetectionApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DetectorError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Image URLs in a response may be absolute or relative to the API base.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    pub async fn upload_and_detect(
        &self,
        selection: &UploadSelection,
        options: DetectionOptions,
    ) -> Result<DetectionResponse> {
        let bytes = tokio::fs::read(&selection.path)
            .await
            .map_err(|e| DetectorError::Request(format!("Failed to read file: {}", e)))?;

        let part = Part::bytes(bytes)
            .file_name(selection.file_name.clone())
            .mime_str(selection.format.mime_type())
            .map_err(request_error)?;

        let form = Form::new()
            .part("file", part)
            .text("enhanced_accuracy", options.enhanced_accuracy.to_string())
            .text("high_precision", options.high_precision.to_string());

        info!(
            "Uploading {} ({} bytes, enhanced_accuracy={}, high_precision={})",
            selection.file_name,
            selection.size_bytes,
            options.enhanced_accuracy,
            options.high_precision
        );

        let response = self
            .http
            .post(self.endpoint(UPLOAD_AND_DETECT_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(request_error)?;

        let detection = ensure_success(response)
            .await?
            .json::<DetectionResponse>()
            .await
            .map_err(request_error)?;

        info!(
            "Inspection {} finished: {} detections in {:.2}s",
            detection.inspection_id, detection.detections_count, detection.processing_time
        );
        Ok(detection)
    }

    pub async fn get_history(&self, query: &HistoryQuery) -> Result<Value> {
        self.get_json(HISTORY_PATH, &query.params()).await
    }

    pub async fn get_model_info(&self) -> Result<Value> {
        self.get_json(MODEL_INFO_PATH, &[]).await
    }

    pub async fn health_check(&self) -> Result<Value> {
        self.get_json(HEALTH_CHECK_PATH, &[]).await
    }

    async fn get_json(&self, path: &str, params: &[(&'static str, String)]) -> Result<Value> {
        debug!("GET {} {:?}", path, params);
        let response = self
            .http
            .get(self.endpoint(path))
            .query(params)
            .send()
            .await
            .map_err(request_error)?;

        ensure_success(response)
            .await?
            .json::<Value>()
            .await
            .map_err(request_error)
    }
}

fn request_error(err: reqwest::Error) -> DetectorError {
    let message = err.to_string();
    if message.is_empty() {
        DetectorError::Request(FALLBACK_MESSAGE.to_string())
    } else {
        DetectorError::Request(message)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    let message = detail_message(&body)
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));

    warn!("{} returned {}: {}", url.path(), status, message);
    Err(DetectorError::Request(message))
}

/// Pulls the `detail` string out of an error body, if the server sent one.
fn detail_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(Value::as_str)
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
}
