use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Bmp,
    Tiff,
}

impl ImageFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "bmp" => Some(ImageFormat::Bmp),
            "tiff" => Some(ImageFormat::Tiff),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Tiff => "image/tiff",
        }
    }
}

/// A file the operator picked for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSelection {
    pub id: u64,
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub format: ImageFormat,
}

/// Which of the two result images an action refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Original,
    Annotated,
}

impl ImageKind {
    pub fn file_suffix(&self) -> &'static str {
        match self {
            ImageKind::Original => "original",
            ImageKind::Annotated => "defects-detected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImageKind::Original => "Original",
            ImageKind::Annotated => "Annotated",
        }
    }
}
