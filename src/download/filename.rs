use crate::upload::ImageKind;
use chrono::{DateTime, Utc};

pub const FALLBACK_BASE_NAME: &str = "wagon-image";

/// Strips the last extension, if any. A trailing dot is not an extension.
fn base_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => {
            let ext = &file_name[idx + 1..];
            if ext.is_empty() || ext.contains('/') {
                file_name
            } else {
                &file_name[..idx]
            }
        }
        None => file_name,
    }
}

/// `{base}-{original|defects-detected}-{YYYY-MM-DDTHH-MM-SS}.jpg`, always
/// `.jpg` whatever the source format was.
pub fn download_filename(source_name: Option<&str>, kind: ImageKind, at: DateTime<Utc>) -> String {
    let base = source_name
        .map(base_name)
        .filter(|b| !b.is_empty())
        .unwrap_or(FALLBACK_BASE_NAME);
    let timestamp = at.format("%Y-%m-%dT%H-%M-%S");
    format!("{}-{}-{}.jpg", base, kind.file_suffix(), timestamp)
}
