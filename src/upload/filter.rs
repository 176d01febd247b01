use crate::error::{DetectorError, Result};
use crate::upload::types::{ImageFormat, UploadSelection};
use crate::utils::file_size::FileSizeUtils;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const MAX_UPLOAD_BYTES: u64 = 52_428_800;
pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "bmp", "tiff"];

/// A dropped or picked file before it has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl Candidate {
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(DetectorError::validation(format!(
                "{} is not a file",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
        })
    }
}

/// Gatekeeper in front of the upload: only images of the accepted types and
/// size ever become a selection.
#[derive(Debug, Default)]
pub struct FileFilter {
    next_id: u64,
}

impl FileFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(candidate: &Candidate) -> Result<ImageFormat> {
        let format = candidate
            .path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
            .ok_or_else(|| {
                DetectorError::validation(format!(
                    "Unsupported file type: {}",
                    candidate.path.display()
                ))
            })?;

        if candidate.size_bytes > MAX_UPLOAD_BYTES {
            return Err(DetectorError::validation(format!(
                "File is too large ({}, max {})",
                FileSizeUtils::format_size(candidate.size_bytes),
                FileSizeUtils::format_size(MAX_UPLOAD_BYTES)
            )));
        }

        Ok(format)
    }

    /// Takes the first acceptable candidate of a drop; the rest are ignored.
    pub fn accept_first<I>(&mut self, candidates: I) -> Option<UploadSelection>
    where
        I: IntoIterator<Item = Candidate>,
    {
        for candidate in candidates {
            match Self::check(&candidate) {
                Ok(format) => {
                    self.next_id += 1;
                    let file_name = candidate
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    debug!("Accepted {} ({:?})", file_name, format);
                    return Some(UploadSelection {
                        id: self.next_id,
                        path: candidate.path,
                        file_name,
                        size_bytes: candidate.size_bytes,
                        format,
                    });
                }
                Err(e) => warn!("Rejected dropped file: {}", e),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, size_bytes: u64) -> Candidate {
        Candidate {
            path: PathBuf::from(format!("/data/{name}")),
            size_bytes,
        }
    }

    #[test]
    fn accepts_every_listed_extension_in_any_case() {
        for name in ["a.jpeg", "b.jpg", "c.png", "d.bmp", "e.tiff", "f.JPG", "g.Png"] {
            assert!(FileFilter::check(&candidate(name, 1024)).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_other_types() {
        for name in ["a.gif", "b.tif", "c.webp", "noext", "d.png.txt"] {
            let err = FileFilter::check(&candidate(name, 10)).unwrap_err();
            assert!(matches!(err, DetectorError::Validation(_)), "{name}");
        }
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(FileFilter::check(&candidate("max.png", MAX_UPLOAD_BYTES)).is_ok());
        assert!(FileFilter::check(&candidate("big.png", MAX_UPLOAD_BYTES + 1)).is_err());
    }

    #[test]
    fn first_acceptable_candidate_wins() {
        let mut filter = FileFilter::new();
        let selection = filter
            .accept_first(vec![
                candidate("notes.txt", 10),
                candidate("wagon1.png", 2048),
                candidate("wagon2.jpg", 2048),
            ])
            .unwrap();
        assert_eq!(selection.file_name, "wagon1.png");
        assert_eq!(selection.format.mime_type(), "image/png");
        assert_eq!(selection.size_bytes, 2048);
    }

    #[test]
    fn nothing_selected_when_all_candidates_fail() {
        let mut filter = FileFilter::new();
        assert!(filter
            .accept_first(vec![candidate("huge.png", MAX_UPLOAD_BYTES + 1)])
            .is_none());
    }

    #[test]
    fn selection_ids_increase() {
        let mut filter = FileFilter::new();
        let first = filter.accept_first(vec![candidate("a.png", 1)]).unwrap();
        let second = filter.accept_first(vec![candidate("a.png", 1)]).unwrap();
        assert!(second.id > first.id);
    }
}
