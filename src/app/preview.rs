use derivative::Derivative;
use eframe::egui;
use std::path::Path;
use tracing::debug;

/// An image URI registered with egui's loaders. Dropping the handle releases
/// the cached bytes and texture, so superseded previews never pile up.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct ScopedImage {
    uri: String,
    #[derivative(Debug = "ignore")]
    ctx: egui::Context,
}

impl ScopedImage {
    pub fn from_path(ctx: &egui::Context, path: &Path) -> Self {
        Self::from_uri(ctx, format!("file://{}", path.display()))
    }

    pub fn from_uri(ctx: &egui::Context, uri: String) -> Self {
        debug!("Acquired image {}", uri);
        Self {
            uri,
            ctx: ctx.clone(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn widget(&self) -> egui::Image<'static> {
        egui::Image::from_uri(self.uri.clone())
    }
}

impl Drop for ScopedImage {
    fn drop(&mut self) {
        debug!("Released image {}", self.uri);
        self.ctx.forget_image(&self.uri);
    }
}

/// The two result images of a detection, released together.
#[derive(Debug)]
pub struct ResultImages {
    pub original: ScopedImage,
    pub annotated: ScopedImage,
}
