use super::{comparison, results, theme, DefectDetectorApp};
use crate::upload::ImageKind;
use crate::utils::color::{hex, palette};
use crate::utils::file_size::FileSizeUtils;
use eframe::egui::{self, Align, Color32, RichText};

impl DefectDetectorApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        let drag_active = ctx.input(|i| !i.raw.hovered_files.is_empty());

        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 40.0;
            let content_height = total_height - footer_height;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add_space(12.0);
                    theme::header(ui);
                    ui.add_space(16.0);

                    self.render_upload(ui, drag_active);

                    if self.session.is_detecting() {
                        ui.add_space(16.0);
                        theme::card(ui, |ui| {
                            ui.vertical_centered(|ui| {
                                ui.add(egui::Spinner::new().size(48.0));
                                ui.heading("🔬 AI Detection in Progress");
                                ui.label(theme::muted(
                                    "Analyzing the wagon image on the detection service",
                                ));
                                ui.add(egui::ProgressBar::new(0.0).animate(true));
                            });
                        });
                    }

                    if let Some(error) = self
                        .error_message
                        .as_deref()
                        .or_else(|| self.session.failure())
                    {
                        ui.add_space(16.0);
                        egui::Frame::none()
                            .fill(hex(palette::ERROR).gamma_multiply(0.12))
                            .stroke(egui::Stroke::new(1.0, hex(palette::ERROR)))
                            .rounding(egui::Rounding::same(8.0))
                            .inner_margin(egui::Margin::same(12.0))
                            .show(ui, |ui| {
                                ui.set_width(ui.available_width());
                                ui.colored_label(hex(palette::ERROR), format!("❌ {}", error));
                            });
                    }

                    if self.session.response().is_some() {
                        ui.add_space(16.0);
                        self.render_results(ui);
                    }

                    ui.add_space(16.0);
                    if let Some(query) = self.service.render(ui, &self.config.api_base) {
                        self.run_service_query(query);
                    }
                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(8.0);
                self.render_footer(ui);
            });
        });
    }

    fn render_upload(&mut self, ui: &mut egui::Ui, drag_active: bool) {
        let detecting = self.session.is_detecting();

        theme::card(ui, |ui| {
            ui.heading("📷 Upload Wagon Image");
            ui.add_space(8.0);

            ui.horizontal_wrapped(|ui| {
                ui.checkbox(
                    &mut self.options.enhanced_accuracy,
                    "Enhanced Accuracy Mode (Multi-stage filtering)",
                );
                ui.add_space(12.0);
                ui.checkbox(
                    &mut self.options.high_precision,
                    "High Precision Mode (GPU optimized)",
                );
            });
            ui.add_space(10.0);

            let (stroke_color, fill) = if drag_active {
                (hex(palette::PRIMARY), hex(palette::PRIMARY_LIGHT).gamma_multiply(0.12))
            } else {
                (Color32::from_gray(200), Color32::WHITE)
            };

            let zone = egui::Frame::none()
                .fill(fill)
                .stroke(egui::Stroke::new(2.0, stroke_color))
                .rounding(egui::Rounding::same(8.0))
                .inner_margin(egui::Margin::same(28.0))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("☁")
                                .size(42.0)
                                .color(hex(palette::PRIMARY)),
                        );
                        if drag_active {
                            ui.label(RichText::new("Drop the image here...").size(18.0));
                        } else {
                            ui.label(
                                RichText::new("Drag & drop a wagon image here, or click to select")
                                    .size(18.0),
                            );
                            ui.label(theme::muted(format!(
                                "Supported formats: JPEG, PNG, BMP, TIFF (max {})",
                                FileSizeUtils::format_size(crate::upload::MAX_UPLOAD_BYTES)
                            )));
                        }
                    });
                });

            let zone = zone.response.interact(egui::Sense::click());
            if zone.clicked() && !detecting {
                self.pick_file();
            }

            if let (Some(preview), Some(selection)) = (&self.preview, self.session.selection()) {
                ui.add_space(14.0);
                ui.label(RichText::new("Preview:").strong());
                ui.vertical_centered(|ui| {
                    ui.add(preview.widget().max_width(400.0).max_height(300.0));
                    ui.label(theme::muted(format!(
                        "{} ({})",
                        selection.file_name,
                        FileSizeUtils::format_kilobytes(selection.size_bytes)
                    )));
                });
            }

            ui.add_space(14.0);
            ui.vertical_centered(|ui| {
                let can_detect = self.session.selection().is_some() && !detecting;
                let label = if detecting {
                    "⏳ Detecting Defects..."
                } else {
                    "📊 Start Defect Detection"
                };
                if ui
                    .add_enabled(can_detect, theme::primary_button(label))
                    .clicked()
                {
                    self.start_detection();
                }
            });
        });
    }

    fn render_results(&mut self, ui: &mut egui::Ui) {
        let Some(response) = self.session.response().cloned() else {
            return;
        };

        theme::card(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Detection Summary");
                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    let any_loading = self.downloads.any();
                    if ui
                        .add_enabled(!any_loading, egui::Button::new("⬇ Download Both"))
                        .clicked()
                    {
                        self.download_both();
                    }

                    let annotated = self.downloads.is_loading(ImageKind::Annotated);
                    let label = if annotated {
                        "⏳ Downloading..."
                    } else {
                        "⬇ Download Results"
                    };
                    if ui
                        .add_enabled(!annotated, theme::primary_button(label))
                        .clicked()
                    {
                        self.download(ImageKind::Annotated);
                    }

                    let original = self.downloads.is_loading(ImageKind::Original);
                    let label = if original {
                        "⏳ Downloading..."
                    } else {
                        "⬇ Download Original"
                    };
                    if ui.add_enabled(!original, egui::Button::new(label)).clicked() {
                        self.download(ImageKind::Original);
                    }
                });
            });
            ui.add_space(10.0);

            results::render_summary_stats(ui, &response);

            ui.add_space(10.0);
            ui.label(theme::muted(
                "💡 Download tips: the original image keeps the uploaded quality; the results \
                 image shows detected defects with colored bounding boxes and confidence scores. \
                 Both are timestamped for easy identification.",
            ));
        });

        ui.add_space(16.0);
        let requested = self.result_images.as_ref().and_then(|images| {
            comparison::render(ui, &mut self.comparison, images, &self.downloads)
        });
        if let Some(kind) = requested {
            self.download(kind);
        }

        ui.add_space(16.0);
        results::render_detections(ui, &response.detections);
    }

    fn render_footer(&mut self, ui: &mut egui::Ui) {
        if let Some(notice) = &self.notice {
            let text = notice.text.clone();
            ui.horizontal(|ui| {
                ui.colored_label(hex(palette::SUCCESS), format!("✅ {}", text));
                if ui.small_button("📂 Open folder").clicked() {
                    self.open_download_folder();
                }
            });
        } else if let Some(saved) = &self.last_saved {
            ui.label(theme::muted(format!("Last saved: {}", saved.display())));
        }

        ui.label(theme::muted(format!(
            "Detection service: {}",
            self.config.api_base
        )));
    }
}
