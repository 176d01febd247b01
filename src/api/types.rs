use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Unknown(raw),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Severity::from)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionMetadata {
    pub scale: Option<f64>,
    pub enhancement: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub texture_factor: Option<f64>,
    pub contrast_factor: Option<f64>,
    pub size_factor: Option<f64>,
    pub edge_factor: Option<f64>,
    pub overall_factor: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectDetection {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub detection_id: Option<String>,
    #[serde(default)]
    pub class_id: Option<i64>,
    pub defect_type: String,
    pub confidence: f64,
    pub severity: Severity,
    #[serde(default)]
    pub priority: Option<i64>,
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub detected_at: Option<String>,
    #[serde(default)]
    pub detection_metadata: Option<DetectionMetadata>,
    #[serde(default)]
    pub confidence_factors: Option<ConfidenceFactors>,
    #[serde(default)]
    pub original_confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceStats {
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub quality_score: Option<String>,
    pub performance_level: Option<String>,
    pub confidence_stats: Option<ConfidenceStats>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelInfo {
    pub architecture: Option<String>,
    pub gpu_memory: Option<String>,
    pub cuda_cores: Option<String>,
    pub precision: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    #[serde(default)]
    pub critical: u32,
    #[serde(default)]
    pub high: u32,
    #[serde(default)]
    pub medium: u32,
    #[serde(default)]
    pub low: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceStatistics {
    pub average_confidence: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
}

/// Result of one upload-and-detect call, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub inspection_id: i64,
    pub filename: String,
    pub processing_time: f64,
    pub status: String,
    pub detections_count: u32,
    #[serde(default)]
    pub detections: Vec<DefectDetection>,
    pub original_image_url: String,
    pub annotated_image_url: String,
    #[serde(default)]
    pub quality_metrics: Option<QualityMetrics>,
    #[serde(default)]
    pub model_info: Option<ModelInfo>,
    #[serde(default)]
    pub enhanced_accuracy_mode: Option<bool>,
    #[serde(default)]
    pub severity_breakdown: Option<SeverityBreakdown>,
    #[serde(default)]
    pub confidence_statistics: Option<ConfidenceStatistics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionOptions {
    pub enhanced_accuracy: bool,
    pub high_precision: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            enhanced_accuracy: true,
            high_precision: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_a_full_backend_reply() {
        let body = json!({
            "inspection_id": 17,
            "filename": "wagon1.png",
            "processing_time": 1.42,
            "status": "completed",
            "detections_count": 2,
            "detections": [
                {
                    "detection_id": "d-1",
                    "defect_type": "surface_crack",
                    "confidence": 0.8734,
                    "severity": "critical",
                    "bounding_box": { "x": 10.4, "y": 20.6, "width": 100.0, "height": 50.5 },
                    "detection_metadata": { "scale": 1.0, "enhancement": "clahe" }
                },
                {
                    "defect_type": "rust",
                    "confidence": 0.5,
                    "severity": "cosmetic",
                    "bounding_box": { "x": 0, "y": 0, "width": 1, "height": 1 }
                }
            ],
            "original_image_url": "http://localhost:8000/static/original/17.jpg",
            "annotated_image_url": "http://localhost:8000/static/annotated/17.jpg",
            "severity_breakdown": { "critical": 1, "high": 0, "medium": 0, "low": 0 },
            "model_info": { "architecture": "YOLOv11", "precision": "FP16" }
        });

        let response: DetectionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.detections_count, 2);
        assert_eq!(response.detections[0].severity, Severity::Critical);
        assert_eq!(response.detections[0].detection_id.as_deref(), Some("d-1"));
        assert_eq!(
            response.detections[1].severity,
            Severity::Unknown("cosmetic".to_string())
        );
        assert_eq!(response.severity_breakdown.unwrap().critical, 1);
        assert!(response.quality_metrics.is_none());
        assert_eq!(
            response.model_info.and_then(|m| m.architecture).as_deref(),
            Some("YOLOv11")
        );
    }

    #[test]
    fn missing_detections_decode_as_empty() {
        let body = json!({
            "inspection_id": 3,
            "filename": "clean.jpg",
            "processing_time": 0.2,
            "status": "completed",
            "detections_count": 0,
            "original_image_url": "/static/original/3.jpg",
            "annotated_image_url": "/static/annotated/3.jpg"
        });

        let response: DetectionResponse = serde_json::from_value(body).unwrap();
        assert!(response.detections.is_empty());
    }

    #[test]
    fn severity_keeps_unknown_labels() {
        let severity: Severity = serde_json::from_str("\"urgent\"").unwrap();
        assert_eq!(severity.to_string(), "urgent");
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
    }
}
