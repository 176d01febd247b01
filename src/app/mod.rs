mod comparison;
mod preview;
mod results;
mod service;
mod state;
mod theme;
mod ui;

use crate::api::{DetectionApiClient, DetectionOptions, DetectionResponse};
use crate::config::Config;
use crate::download::{download_filename, DownloadJob, ImageDownloader};
use crate::error::Result;
use crate::upload::{Candidate, FileFilter, ImageKind, UploadSelection, ACCEPTED_EXTENSIONS};
use chrono::Utc;
use eframe::{egui, App};
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc::{self as std_mpsc, Receiver, Sender};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{error, info, warn};

pub use comparison::ComparisonView;
pub use preview::{ResultImages, ScopedImage};
pub use results::{
    build_view, format_confidence, format_defect_name, severity_tone, DetectionRow, ResultsView,
    Tone,
};
pub use service::{ServicePanel, ServiceQuery};
pub use state::{DownloadState, Session, SessionEvent, BUSY_MESSAGE, NO_FILE_MESSAGE};

const NOTICE_SECONDS: f64 = 4.0;

enum AppMessage {
    DetectionFinished {
        selection_id: u64,
        result: Result<DetectionResponse>,
    },
    DownloadFinished {
        selection_id: u64,
        kind: ImageKind,
        outcome: std::result::Result<PathBuf, String>,
        in_batch: bool,
    },
    BatchFinished {
        selection_id: u64,
        result: Result<(PathBuf, PathBuf)>,
    },
    ServiceFinished {
        query: ServiceQuery,
        result: Result<Value>,
    },
}

struct Notice {
    text: String,
    expires_at: f64,
}

pub struct DefectDetectorApp {
    config: Config,
    client: DetectionApiClient,
    downloader: ImageDownloader,
    runtime: Runtime,
    ctx: egui::Context,
    session: Session,
    filter: FileFilter,
    options: DetectionOptions,
    preview: Option<ScopedImage>,
    result_images: Option<ResultImages>,
    comparison: ComparisonView,
    downloads: DownloadState,
    error_message: Option<String>,
    notice: Option<Notice>,
    last_saved: Option<PathBuf>,
    service: ServicePanel,
    sender: Sender<AppMessage>,
    receiver: Receiver<AppMessage>,
}

impl DefectDetectorApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Config,
        client: DetectionApiClient,
        runtime: Runtime,
    ) -> Self {
        info!("Initializing Train Wagon Defect Detector");
        egui_extras::install_image_loaders(&cc.egui_ctx);
        theme::apply(&cc.egui_ctx);

        let downloader = ImageDownloader::new(client.http().clone(), config.download_dir.clone());
        let options = DetectionOptions {
            enhanced_accuracy: config.enhanced_accuracy,
            high_precision: config.high_precision,
        };
        let (sender, receiver) = std_mpsc::channel();

        Self {
            config,
            client,
            downloader,
            runtime,
            ctx: cc.egui_ctx.clone(),
            session: Session::default(),
            filter: FileFilter::new(),
            options,
            preview: None,
            result_images: None,
            comparison: ComparisonView::default(),
            downloads: DownloadState::default(),
            error_message: None,
            notice: None,
            last_saved: None,
            service: ServicePanel::default(),
            sender,
            receiver,
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = AppMessage> + Send + 'static,
    {
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let message = task.await;
            if sender.send(message).is_err() {
                warn!("UI is gone, dropping task result");
            }
            ctx.request_repaint();
        });
    }

    fn show_notice(&mut self, text: impl Into<String>) {
        let now = self.ctx.input(|i| i.time);
        self.notice = Some(Notice {
            text: text.into(),
            expires_at: now + NOTICE_SECONDS,
        });
    }

    pub fn select_candidates(&mut self, candidates: Vec<Candidate>) {
        let Some(selection) = self.filter.accept_first(candidates) else {
            return;
        };

        match self.session.apply(SessionEvent::FileSelected(selection.clone())) {
            Ok(next) => {
                info!("Selected {} ({} bytes)", selection.file_name, selection.size_bytes);
                self.session = next;
                // release first; reselecting the same file reuses its URI
                self.preview = None;
                self.preview = Some(ScopedImage::from_path(&self.ctx, &selection.path));
                self.result_images = None;
                self.downloads = DownloadState::default();
                self.error_message = None;
            }
            Err(e) => warn!("Ignoring {}: {}", selection.file_name, e),
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let candidates = dropped
            .iter()
            .filter_map(|file| file.path.as_deref())
            .filter_map(|path| match Candidate::from_path(path) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    warn!("Cannot read dropped file {}: {}", path.display(), e);
                    None
                }
            })
            .collect();
        self.select_candidates(candidates);
    }

    pub fn pick_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &ACCEPTED_EXTENSIONS[..])
            .pick_file()
        else {
            return;
        };

        match Candidate::from_path(&path) {
            Ok(candidate) => self.select_candidates(vec![candidate]),
            Err(e) => warn!("Cannot read {}: {}", path.display(), e),
        }
    }

    pub fn start_detection(&mut self) {
        let next = match self.session.apply(SessionEvent::DetectRequested) {
            Ok(next) => next,
            Err(e) => {
                self.error_message = Some(e.reason());
                return;
            }
        };

        let Some(selection) = next.selection().cloned() else {
            return;
        };
        self.session = next;
        self.error_message = None;

        let client = self.client.clone();
        let options = self.options;
        self.spawn(async move {
            let result = client.upload_and_detect(&selection, options).await;
            AppMessage::DetectionFinished {
                selection_id: selection.id,
                result,
            }
        });
    }

    fn finish_detection(&mut self, selection_id: u64, result: Result<DetectionResponse>) {
        let event = match result {
            Ok(response) => SessionEvent::DetectionSucceeded {
                selection_id,
                response,
            },
            Err(e) => {
                warn!("Detection failed: {}", e);
                SessionEvent::DetectionFailed {
                    selection_id,
                    message: e.reason(),
                }
            }
        };

        let was_detecting = self.session.is_detecting();
        match self.session.apply(event) {
            Ok(next) => self.session = next,
            Err(e) => {
                error!("Unexpected detection outcome: {}", e);
                return;
            }
        }

        if was_detecting {
            if let Some(response) = self.session.response() {
                self.result_images = Some(ResultImages {
                    original: ScopedImage::from_uri(
                        &self.ctx,
                        self.client.resolve_url(&response.original_image_url),
                    ),
                    annotated: ScopedImage::from_uri(
                        &self.ctx,
                        self.client.resolve_url(&response.annotated_image_url),
                    ),
                });
            }
        }
    }

    fn download_job(&self, kind: ImageKind) -> Option<DownloadJob> {
        let response = self.session.response()?;
        let url = match kind {
            ImageKind::Original => &response.original_image_url,
            ImageKind::Annotated => &response.annotated_image_url,
        };
        let source_name = self.session.selection().map(|s: &UploadSelection| s.file_name.as_str());

        Some(DownloadJob {
            kind,
            url: self.client.resolve_url(url),
            file_name: download_filename(source_name, kind, Utc::now()),
        })
    }

    pub fn download(&mut self, kind: ImageKind) {
        if self.downloads.is_loading(kind) {
            return;
        }
        let (Some(selection_id), Some(job)) = (self.selection_id(), self.download_job(kind)) else {
            return;
        };

        self.downloads.set(kind, true);
        self.error_message = None;
        let downloader = self.downloader.clone();
        self.spawn(async move {
            let outcome = downloader.download(&job).await.map_err(|e| e.reason());
            AppMessage::DownloadFinished {
                selection_id,
                kind,
                outcome,
                in_batch: false,
            }
        });
    }

    pub fn download_both(&mut self) {
        if self.downloads.any() {
            return;
        }
        let (Some(selection_id), Some(original), Some(annotated)) = (
            self.selection_id(),
            self.download_job(ImageKind::Original),
            self.download_job(ImageKind::Annotated),
        ) else {
            return;
        };

        self.downloads.set(ImageKind::Original, true);
        self.downloads.set(ImageKind::Annotated, true);
        self.error_message = None;

        let downloader = self.downloader.clone();
        let progress = self.sender.clone();
        let ctx = self.ctx.clone();
        self.spawn(async move {
            let result = downloader
                .download_both(&original, &annotated, |kind, result| {
                    let outcome = match result {
                        Ok(path) => Ok(path.clone()),
                        Err(e) => Err(e.reason()),
                    };
                    let message = AppMessage::DownloadFinished {
                        selection_id,
                        kind,
                        outcome,
                        in_batch: true,
                    };
                    if progress.send(message).is_err() {
                        warn!("UI is gone, dropping {} download result", kind.label());
                    }
                    ctx.request_repaint();
                })
                .await;
            AppMessage::BatchFinished {
                selection_id,
                result,
            }
        });
    }

    fn selection_id(&self) -> Option<u64> {
        self.session.selection().map(|s| s.id)
    }

    fn finish_download(
        &mut self,
        selection_id: u64,
        kind: ImageKind,
        outcome: std::result::Result<PathBuf, String>,
        in_batch: bool,
    ) {
        if let Ok(path) = &outcome {
            self.last_saved = Some(path.clone());
        }
        // flags were already reset when the selection changed
        if !self.session.owns_outcome(selection_id) {
            info!("{} download for an earlier selection settled", kind.label());
            return;
        }

        self.downloads.set(kind, false);
        match outcome {
            Ok(_) => {
                if !in_batch {
                    self.show_notice(format!("{} image downloaded successfully!", kind.label()));
                }
            }
            Err(reason) if in_batch => warn!("{} download failed: {}", kind.label(), reason),
            Err(reason) => self.error_message = Some(format!("Download failed: {}", reason)),
        }
    }

    fn finish_batch(&mut self, selection_id: u64, result: Result<(PathBuf, PathBuf)>) {
        if !self.session.owns_outcome(selection_id) {
            return;
        }
        match result {
            Ok(_) => self.show_notice("Both images downloaded successfully!"),
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    pub fn run_service_query(&mut self, query: ServiceQuery) {
        if !self.service.begin(query) {
            return;
        }

        let client = self.client.clone();
        let history = self.service.history_query();
        self.spawn(async move {
            let result = match query {
                ServiceQuery::Health => client.health_check().await,
                ServiceQuery::ModelInfo => client.get_model_info().await,
                ServiceQuery::History => client.get_history(&history).await,
            };
            AppMessage::ServiceFinished { query, result }
        });
    }

    pub fn open_download_folder(&self) {
        let dir = self.downloader.target_dir();
        if let Err(e) = open::that(dir) {
            warn!("Failed to open {}: {}", dir.display(), e);
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        self.handle_dropped_files(ctx);

        while let Ok(message) = self.receiver.try_recv() {
            match message {
                AppMessage::DetectionFinished {
                    selection_id,
                    result,
                } => self.finish_detection(selection_id, result),
                AppMessage::DownloadFinished {
                    selection_id,
                    kind,
                    outcome,
                    in_batch,
                } => self.finish_download(selection_id, kind, outcome, in_batch),
                AppMessage::BatchFinished {
                    selection_id,
                    result,
                } => self.finish_batch(selection_id, result),
                AppMessage::ServiceFinished { query, result } => {
                    self.service.finish(query, result)
                }
            }
        }

        if let Some(notice) = &self.notice {
            let now = ctx.input(|i| i.time);
            if now >= notice.expires_at {
                self.notice = None;
            } else {
                ctx.request_repaint_after(Duration::from_secs_f64(notice.expires_at - now));
            }
        }
    }
}

impl App for DefectDetectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
