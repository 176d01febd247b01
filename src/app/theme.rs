use super::results::Tone;
use crate::utils::color::{hex, palette};
use eframe::egui::{self, Color32, RichText, Rounding};

pub fn apply(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    let visuals = &mut style.visuals;

    *visuals = egui::Visuals::light();
    visuals.panel_fill = hex(palette::BACKGROUND);
    visuals.window_rounding = Rounding::same(12.0);
    visuals.selection.bg_fill = hex(palette::PRIMARY_LIGHT);
    visuals.hyperlink_color = hex(palette::PRIMARY_DARK);

    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.noninteractive,
    ] {
        widget.rounding = Rounding::same(8.0);
    }

    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    ctx.set_style(style);
}

pub fn tone_color(tone: Tone) -> Color32 {
    match tone {
        Tone::Error => hex(palette::ERROR),
        Tone::Warning => hex(palette::WARNING),
        Tone::Info => hex(palette::INFO),
        Tone::Success => hex(palette::SUCCESS),
        Tone::Default => hex(palette::NEUTRAL),
    }
}

pub fn muted(text: impl Into<String>) -> RichText {
    RichText::new(text).color(Color32::from_gray(110))
}

pub fn primary_button(text: &str) -> impl egui::Widget {
    egui::Button::new(RichText::new(text.to_string()).color(Color32::WHITE).strong())
        .fill(hex(palette::PRIMARY))
}

/// White rounded panel, the building block of every section.
pub fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::none()
        .fill(Color32::WHITE)
        .rounding(Rounding::same(12.0))
        .stroke(egui::Stroke::new(1.0, Color32::from_gray(225)))
        .inner_margin(egui::Margin::same(20.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

pub fn header(ui: &mut egui::Ui) {
    egui::Frame::none()
        .fill(hex(palette::HEADER_END))
        .stroke(egui::Stroke::new(2.0, hex(palette::HEADER_START)))
        .rounding(Rounding::same(12.0))
        .inner_margin(egui::Margin::same(28.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("🚂 Train Wagon Defect Detector")
                        .size(30.0)
                        .strong()
                        .color(Color32::WHITE),
                );
                ui.add_space(4.0);
                ui.label(
                    RichText::new("AI-Powered Railway Inspection System")
                        .size(17.0)
                        .color(Color32::from_white_alpha(230)),
                );
                ui.label(
                    RichText::new("Upload train wagon images to detect defects with the remote detection service")
                        .color(Color32::from_white_alpha(210)),
                );
            });
        });
}
