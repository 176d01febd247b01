mod filter;
mod types;

pub use filter::{Candidate, FileFilter, ACCEPTED_EXTENSIONS, MAX_UPLOAD_BYTES};
pub use types::{ImageFormat, ImageKind, UploadSelection};
