use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Request(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Batch download failed: {0}")]
    BatchDownload(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DetectorError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The message without the variant's prefix.
    pub fn reason(&self) -> String {
        match self {
            Self::Validation(m)
            | Self::Request(m)
            | Self::Download(m)
            | Self::BatchDownload(m)
            | Self::Config(m) => m.clone(),
            Self::Io(e) => e.to_string(),
            Self::Json(e) => e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DetectorError>;
