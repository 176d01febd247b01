//! Saving result images to disk.
//!
//! Each download fetches the image, writes it to a temporary file inside the
//! target directory and only then moves it to its final name, so a failed
//! download never leaves a partial file behind.

mod filename;

pub use filename::{download_filename, FALLBACK_BASE_NAME};

use crate::error::{DetectorError, Result};
use crate::upload::ImageKind;
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub kind: ImageKind,
    pub url: String,
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct ImageDownloader {
    http: Client,
    target_dir: PathBuf,
}

impl ImageDownloader {
    pub fn new(http: Client, target_dir: PathBuf) -> Self {
        Self { http, target_dir }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub async fn download(&self, job: &DownloadJob) -> Result<PathBuf> {
        info!("Downloading {} image from {}", job.kind.label(), job.url);

        let response = self
            .http
            .get(&job.url)
            .send()
            .await
            .map_err(|e| DetectorError::Download(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or(status.as_str());
            warn!("{} image fetch returned {}", job.kind.label(), status);
            return Err(DetectorError::Download(format!(
                "Failed to fetch image: {}",
                reason
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DetectorError::Download(e.to_string()))?;

        let dir = self.target_dir.clone();
        let destination = dir.join(&job.file_name);
        let saved = tokio::task::spawn_blocking(move || save_atomically(&dir, &destination, &bytes))
            .await
            .map_err(|e| DetectorError::Download(e.to_string()))?
            .map_err(|e| DetectorError::Download(format!("Failed to save image: {}", e)))?;

        info!("Saved {} image to {}", job.kind.label(), saved.display());
        Ok(saved)
    }

    /// Runs both downloads concurrently. `on_each` fires as each one settles;
    /// the combined result is only `Ok` when both succeeded.
    pub async fn download_both<F>(
        &self,
        original: &DownloadJob,
        annotated: &DownloadJob,
        on_each: F,
    ) -> Result<(PathBuf, PathBuf)>
    where
        F: Fn(ImageKind, &Result<PathBuf>),
    {
        let (original, annotated) = tokio::join!(
            self.download_reporting(original, &on_each),
            self.download_reporting(annotated, &on_each)
        );

        match (original, annotated) {
            (Ok(original), Ok(annotated)) => Ok((original, annotated)),
            (Err(e), _) | (_, Err(e)) => Err(DetectorError::BatchDownload(e.reason())),
        }
    }

    async fn download_reporting<F>(&self, job: &DownloadJob, on_each: &F) -> Result<PathBuf>
    where
        F: Fn(ImageKind, &Result<PathBuf>),
    {
        let result = self.download(job).await;
        on_each(job.kind, &result);
        result
    }
}

fn save_atomically(dir: &Path, destination: &Path, bytes: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(destination).map_err(|e| e.error)?;
    Ok(destination.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_replaces_existing_files() {
        let dir = tempdir().unwrap();
        let destination = dir.path().join("a.jpg");
        std::fs::write(&destination, b"old").unwrap();

        save_atomically(dir.path(), &destination, b"new").unwrap();

        assert_eq!(std::fs::read(&destination).unwrap(), b"new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn save_creates_the_target_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("downloads");
        let destination = nested.join("b.jpg");

        save_atomically(&nested, &destination, b"jpeg").unwrap();

        assert!(destination.exists());
    }
}
