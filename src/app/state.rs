use crate::api::DetectionResponse;
use crate::error::{DetectorError, Result};
use crate::upload::{ImageKind, UploadSelection};
use std::sync::Arc;
use tracing::debug;

pub const NO_FILE_MESSAGE: &str = "Please select an image file first";
pub const BUSY_MESSAGE: &str = "Detection is already in progress";

/// One inspection session. Only `apply` moves between states.
#[derive(Debug, Clone, Default)]
pub enum Session {
    #[default]
    Idle,
    Selected {
        selection: UploadSelection,
    },
    Detecting {
        selection: UploadSelection,
    },
    Resulted {
        selection: UploadSelection,
        response: Arc<DetectionResponse>,
    },
    Failed {
        selection: UploadSelection,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    FileSelected(UploadSelection),
    DetectRequested,
    DetectionSucceeded {
        selection_id: u64,
        response: DetectionResponse,
    },
    DetectionFailed {
        selection_id: u64,
        message: String,
    },
}

impl Session {
    pub fn selection(&self) -> Option<&UploadSelection> {
        match self {
            Session::Idle => None,
            Session::Selected { selection }
            | Session::Detecting { selection }
            | Session::Resulted { selection, .. }
            | Session::Failed { selection, .. } => Some(selection),
        }
    }

    pub fn response(&self) -> Option<&Arc<DetectionResponse>> {
        match self {
            Session::Resulted { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Session::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether a background outcome tagged with `selection_id` still
    /// belongs to the file on screen.
    pub fn owns_outcome(&self, selection_id: u64) -> bool {
        self.selection().is_some_and(|s| s.id == selection_id)
    }

    pub fn is_detecting(&self) -> bool {
        matches!(self, Session::Detecting { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Session::Idle => "Idle",
            Session::Selected { .. } => "Selected",
            Session::Detecting { .. } => "Detecting",
            Session::Resulted { .. } => "Resulted",
            Session::Failed { .. } => "Failed",
        }
    }

    pub fn apply(&self, event: SessionEvent) -> Result<Session> {
        match (self, event) {
            (Session::Detecting { .. }, SessionEvent::FileSelected(_)) => {
                Err(DetectorError::validation(BUSY_MESSAGE))
            }
            (_, SessionEvent::FileSelected(selection)) => Ok(Session::Selected { selection }),

            (Session::Idle, SessionEvent::DetectRequested) => {
                Err(DetectorError::validation(NO_FILE_MESSAGE))
            }
            (Session::Detecting { .. }, SessionEvent::DetectRequested) => {
                Err(DetectorError::validation(BUSY_MESSAGE))
            }
            (current, SessionEvent::DetectRequested) => {
                let selection = current
                    .selection()
                    .cloned()
                    .ok_or_else(|| DetectorError::validation(NO_FILE_MESSAGE))?;
                Ok(Session::Detecting { selection })
            }

            (
                Session::Detecting { selection },
                SessionEvent::DetectionSucceeded {
                    selection_id,
                    response,
                },
            ) if selection.id == selection_id => Ok(Session::Resulted {
                selection: selection.clone(),
                response: Arc::new(response),
            }),
            (
                Session::Detecting { selection },
                SessionEvent::DetectionFailed {
                    selection_id,
                    message,
                },
            ) if selection.id == selection_id => Ok(Session::Failed {
                selection: selection.clone(),
                message,
            }),

            (current, stale) => {
                debug!("Ignoring {:?} in state {}", stale, current.name());
                Ok(current.clone())
            }
        }
    }
}

/// Per-image "download in flight" flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadState {
    pub original: bool,
    pub annotated: bool,
}

impl DownloadState {
    pub fn is_loading(&self, kind: ImageKind) -> bool {
        match kind {
            ImageKind::Original => self.original,
            ImageKind::Annotated => self.annotated,
        }
    }

    pub fn set(&mut self, kind: ImageKind, loading: bool) {
        match kind {
            ImageKind::Original => self.original = loading,
            ImageKind::Annotated => self.annotated = loading,
        }
    }

    pub fn any(&self) -> bool {
        self.original || self.annotated
    }
}
