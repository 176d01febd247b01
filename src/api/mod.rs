mod client;
mod types;

pub use client::{DetectionApiClient, HistoryQuery, DEFAULT_HISTORY_LIMIT, REQUEST_TIMEOUT};
pub use types::{
    BoundingBox, ConfidenceFactors, ConfidenceStatistics, ConfidenceStats, DefectDetection,
    DetectionMetadata, DetectionOptions, DetectionResponse, ModelInfo, QualityMetrics, Severity,
    SeverityBreakdown,
};
