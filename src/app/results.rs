use super::theme;
use crate::api::{DefectDetection, DetectionResponse, Severity};
use eframe::egui::{self, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Error,
    Warning,
    Info,
    Success,
    Default,
}

pub fn severity_tone(severity: &Severity) -> Tone {
    match severity {
        Severity::Critical => Tone::Error,
        Severity::High => Tone::Warning,
        Severity::Medium => Tone::Info,
        Severity::Low => Tone::Success,
        Severity::Unknown(_) => Tone::Default,
    }
}

fn severity_icon(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical => "⛔",
        Severity::High => "⚠",
        Severity::Low => "✔",
        Severity::Medium | Severity::Unknown(_) => "ℹ",
    }
}

/// `surface_crack` -> `Surface Crack`
pub fn format_defect_name(defect_type: &str) -> String {
    defect_type
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRow {
    pub label: String,
    pub severity: String,
    pub icon: &'static str,
    pub tone: Tone,
    pub confidence: String,
    pub location: String,
    pub size: String,
}

impl From<&DefectDetection> for DetectionRow {
    fn from(detection: &DefectDetection) -> Self {
        let bbox = &detection.bounding_box;
        Self {
            label: format_defect_name(&detection.defect_type),
            severity: detection.severity.as_str().to_uppercase(),
            icon: severity_icon(&detection.severity),
            tone: severity_tone(&detection.severity),
            confidence: format_confidence(detection.confidence),
            location: format!("({}, {})", bbox.x.round() as i64, bbox.y.round() as i64),
            size: format!("{} × {}", bbox.width.round() as i64, bbox.height.round() as i64),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    NoDefects,
    Table(Vec<DetectionRow>),
}

/// Rows keep the detector's order.
pub fn build_view(detections: &[DefectDetection]) -> ResultsView {
    if detections.is_empty() {
        ResultsView::NoDefects
    } else {
        ResultsView::Table(detections.iter().map(DetectionRow::from).collect())
    }
}

pub fn render_detections(ui: &mut egui::Ui, detections: &[DefectDetection]) {
    theme::card(ui, |ui| match build_view(detections) {
        ResultsView::NoDefects => {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("✔")
                        .size(48.0)
                        .color(theme::tone_color(Tone::Success)),
                );
                ui.heading("No Defects Detected");
                ui.label(theme::muted("The wagon appears to be in good condition."));
            });
        }
        ResultsView::Table(rows) => {
            ui.heading("Detected Defects");
            ui.add_space(8.0);
            egui::Grid::new("detections_table")
                .striped(true)
                .num_columns(5)
                .spacing([24.0, 8.0])
                .show(ui, |ui| {
                    for header in ["Defect Type", "Severity", "Confidence", "Location", "Size"] {
                        ui.label(RichText::new(header).strong());
                    }
                    ui.end_row();

                    for row in &rows {
                        let color = theme::tone_color(row.tone);
                        ui.horizontal(|ui| {
                            ui.colored_label(color, row.icon);
                            ui.label(row.label.as_str());
                        });
                        ui.label(
                            RichText::new(&row.severity)
                                .color(egui::Color32::WHITE)
                                .background_color(color)
                                .small(),
                        );
                        ui.label(RichText::new(&row.confidence).strong());
                        ui.label(format!("📍 {}", row.location));
                        ui.label(row.size.as_str());
                        ui.end_row();
                    }
                });
        }
    });
}

fn stat_card(ui: &mut egui::Ui, value: String, caption: &str, tone: Tone) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(12.0))
        .show(ui, |ui| {
            ui.set_min_width(120.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(value)
                        .size(26.0)
                        .color(theme::tone_color(tone)),
                );
                ui.label(caption);
            });
        });
}

pub fn render_summary_stats(ui: &mut egui::Ui, response: &DetectionResponse) {
    ui.horizontal_wrapped(|ui| {
        stat_card(
            ui,
            response.detections_count.to_string(),
            "Defects Found",
            Tone::Info,
        );
        stat_card(
            ui,
            format!("{}s", response.processing_time),
            "Processing Time",
            Tone::Warning,
        );
        if let Some(breakdown) = &response.severity_breakdown {
            stat_card(ui, breakdown.critical.to_string(), "Critical", Tone::Error);
            stat_card(ui, breakdown.high.to_string(), "High", Tone::Warning);
            stat_card(ui, breakdown.medium.to_string(), "Medium", Tone::Info);
            stat_card(ui, breakdown.low.to_string(), "Low", Tone::Success);
        }
    });

    let mut details: Vec<(&str, String)> = vec![
        ("Inspection", format!("#{}", response.inspection_id)),
        ("Status", response.status.clone()),
    ];
    if let Some(enhanced) = response.enhanced_accuracy_mode {
        details.push(("Enhanced accuracy", if enhanced { "on" } else { "off" }.to_string()));
    }
    if let Some(stats) = &response.confidence_statistics {
        details.push((
            "Confidence (avg / min / max)",
            format!(
                "{} / {} / {}",
                format_confidence(stats.average_confidence),
                format_confidence(stats.min_confidence),
                format_confidence(stats.max_confidence)
            ),
        ));
    }
    if let Some(quality) = &response.quality_metrics {
        if let Some(score) = &quality.quality_score {
            details.push(("Quality score", score.clone()));
        }
        if let Some(level) = &quality.performance_level {
            details.push(("Performance", level.clone()));
        }
    }
    if let Some(model) = &response.model_info {
        let fields = [
            ("Architecture", &model.architecture),
            ("GPU memory", &model.gpu_memory),
            ("CUDA cores", &model.cuda_cores),
            ("Precision", &model.precision),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                details.push((label, value.clone()));
            }
        }
    }

    ui.add_space(8.0);
    egui::Grid::new("summary_details")
        .num_columns(2)
        .spacing([16.0, 4.0])
        .show(ui, |ui| {
            for (label, value) in details {
                ui.label(theme::muted(label));
                ui.label(value);
                ui.end_row();
            }
        });
}
