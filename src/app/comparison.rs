use super::preview::ResultImages;
use super::state::DownloadState;
use super::theme;
use crate::upload::ImageKind;
use eframe::egui::{self, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonView {
    Original,
    Annotated,
    #[default]
    Both,
}

impl ComparisonView {
    pub fn visible(&self) -> &'static [ImageKind] {
        match self {
            ComparisonView::Original => &[ImageKind::Original],
            ComparisonView::Annotated => &[ImageKind::Annotated],
            ComparisonView::Both => &[ImageKind::Original, ImageKind::Annotated],
        }
    }
}

fn download_label(kind: ImageKind, loading: bool, single: bool) -> &'static str {
    match (kind, loading, single) {
        (_, true, _) => "⏳ Downloading...",
        (ImageKind::Original, false, true) => "⬇ Download Original",
        (ImageKind::Original, false, false) => "⬇ Download",
        (ImageKind::Annotated, false, _) => "⬇ Download Results",
    }
}

fn image_panel(
    ui: &mut egui::Ui,
    kind: ImageKind,
    image: egui::Image<'static>,
    loading: bool,
    single: bool,
    requested: &mut Option<ImageKind>,
) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.vertical(|ui| {
            match kind {
                ImageKind::Original => {
                    ui.label(RichText::new("🖼 Original Image").strong());
                }
                ImageKind::Annotated => {
                    ui.label(RichText::new("🐞 Annotated Image").strong());
                    ui.label(theme::muted("(with defect bounding boxes)").small());
                }
            }
            let max_width = ui.available_width();
            ui.add(image.max_height(400.0).max_width(max_width));
            ui.vertical_centered(|ui| {
                if ui
                    .add_enabled(!loading, egui::Button::new(download_label(kind, loading, single)))
                    .clicked()
                {
                    *requested = Some(kind);
                }
            });
        });
    });
}

/// Draws the comparison card. Returns the image whose download button was
/// pressed this frame, if any.
pub fn render(
    ui: &mut egui::Ui,
    view: &mut ComparisonView,
    images: &ResultImages,
    downloads: &DownloadState,
) -> Option<ImageKind> {
    let mut requested = None;

    theme::card(ui, |ui| {
        ui.horizontal(|ui| {
            ui.heading("⇄ Image Comparison");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.selectable_value(view, ComparisonView::Both, "⇄ Both");
                ui.selectable_value(view, ComparisonView::Annotated, "🐞 Annotated");
                ui.selectable_value(view, ComparisonView::Original, "🖼 Original");
            });
        });
        ui.add_space(10.0);

        let kinds = view.visible();
        let single = kinds.len() == 1;
        ui.columns(kinds.len(), |columns| {
            for (column, kind) in columns.iter_mut().zip(kinds) {
                let image = match kind {
                    ImageKind::Original => images.original.widget(),
                    ImageKind::Annotated => images.annotated.widget(),
                };
                image_panel(
                    column,
                    *kind,
                    image,
                    downloads.is_loading(*kind),
                    single,
                    &mut requested,
                );
            }
        });

        ui.add_space(10.0);
        ui.label(RichText::new("📥 Download Information").strong());
        ui.label(theme::muted(
            "• Original Image: source image as uploaded\n\
             • Results Image: annotated with colored defect boxes and confidence scores\n\
             • File Names: generated with timestamps for easy organization",
        ));
    });

    requested
}
