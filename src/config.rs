//! Runtime configuration, read once at startup.

use std::path::PathBuf;

pub const API_URL_VAR: &str = "DEFECT_API_URL";
pub const DOWNLOAD_DIR_VAR: &str = "DEFECT_DOWNLOAD_DIR";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub download_dir: PathBuf,
    pub enhanced_accuracy: bool,
    pub high_precision: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            download_dir: default_download_dir(),
            enhanced_accuracy: true,
            high_precision: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.api_base = base.trim().trim_end_matches('/').to_string();
        }

        if let Some(dir) = lookup(DOWNLOAD_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            config.download_dir = PathBuf::from(dir.trim());
        }

        config
    }
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
