use super::theme;
use crate::api::{HistoryQuery, DEFAULT_HISTORY_LIMIT};
use crate::error::Result;
use eframe::egui::{self, Color32, RichText};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceQuery {
    Health,
    ModelInfo,
    History,
}

impl ServiceQuery {
    const ALL: [ServiceQuery; 3] = [
        ServiceQuery::Health,
        ServiceQuery::ModelInfo,
        ServiceQuery::History,
    ];

    fn label(&self) -> &'static str {
        match self {
            ServiceQuery::Health => "🩺 Health check",
            ServiceQuery::ModelInfo => "🧠 Model info",
            ServiceQuery::History => "🗂 History",
        }
    }
}

/// Backend status queries: health, model and inspection history.
#[derive(Debug)]
pub struct ServicePanel {
    pub history_limit: u32,
    pub history_status: String,
    replies: HashMap<ServiceQuery, std::result::Result<String, String>>,
    in_flight: HashSet<ServiceQuery>,
}

impl Default for ServicePanel {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_status: String::new(),
            replies: HashMap::new(),
            in_flight: HashSet::new(),
        }
    }
}

impl ServicePanel {
    pub fn history_query(&self) -> HistoryQuery {
        let status = self.history_status.trim();
        HistoryQuery {
            limit: self.history_limit,
            status: (!status.is_empty()).then(|| status.to_string()),
        }
    }

    /// Marks a query as running. Returns false if it already is.
    pub fn begin(&mut self, query: ServiceQuery) -> bool {
        self.in_flight.insert(query)
    }

    pub fn finish(&mut self, query: ServiceQuery, result: Result<Value>) {
        self.in_flight.remove(&query);
        let reply = match result {
            Ok(value) => serde_json::to_string_pretty(&value).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        self.replies.insert(query, reply);
    }

    pub fn is_running(&self, query: ServiceQuery) -> bool {
        self.in_flight.contains(&query)
    }

    pub fn reply(&self, query: ServiceQuery) -> Option<&std::result::Result<String, String>> {
        self.replies.get(&query)
    }

    pub fn render(&mut self, ui: &mut egui::Ui, api_base: &str) -> Option<ServiceQuery> {
        let mut requested = None;

        theme::card(ui, |ui| {
            egui::CollapsingHeader::new(RichText::new("🛰 Detection Service").heading())
                .default_open(false)
                .show(ui, |ui| {
                    ui.label(theme::muted(format!("Endpoint: {}", api_base)));
                    ui.add_space(6.0);

                    ui.horizontal(|ui| {
                        ui.label("History limit");
                        ui.add(egui::DragValue::new(&mut self.history_limit).clamp_range(1..=500));
                        ui.label("Status");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.history_status)
                                .hint_text("any")
                                .desired_width(100.0),
                        );
                    });
                    ui.add_space(6.0);

                    ui.horizontal(|ui| {
                        for query in ServiceQuery::ALL {
                            let running = self.is_running(query);
                            if ui
                                .add_enabled(!running, egui::Button::new(query.label()))
                                .clicked()
                            {
                                requested = Some(query);
                            }
                            if running {
                                ui.spinner();
                            }
                        }
                    });

                    for query in ServiceQuery::ALL {
                        let Some(reply) = self.reply(query) else {
                            continue;
                        };
                        ui.add_space(8.0);
                        ui.label(RichText::new(query.label()).strong());
                        match reply {
                            Ok(json) => {
                                egui::ScrollArea::vertical()
                                    .id_source(query.label())
                                    .max_height(160.0)
                                    .show(ui, |ui| {
                                        ui.monospace(json.as_str());
                                    });
                            }
                            Err(err) => {
                                ui.colored_label(Color32::from_rgb(220, 50, 50), err.as_str());
                            }
                        }
                    }
                });
        });

        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectorError;
    use serde_json::json;

    #[test]
    fn history_query_from_panel_fields() {
        let mut panel = ServicePanel::default();
        assert_eq!(panel.history_query(), HistoryQuery::default());

        panel.history_limit = 10;
        panel.history_status = " failed ".into();
        assert_eq!(
            panel.history_query(),
            HistoryQuery {
                limit: 10,
                status: Some("failed".into())
            }
        );
    }

    #[test]
    fn one_query_of_each_kind_at_a_time() {
        let mut panel = ServicePanel::default();
        assert!(panel.begin(ServiceQuery::Health));
        assert!(!panel.begin(ServiceQuery::Health));
        assert!(panel.begin(ServiceQuery::History));

        panel.finish(ServiceQuery::Health, Ok(json!({"status": "healthy"})));
        assert!(!panel.is_running(ServiceQuery::Health));
        assert!(panel.is_running(ServiceQuery::History));
    }

    #[test]
    fn replies_are_kept_per_query() {
        let mut panel = ServicePanel::default();
        panel.begin(ServiceQuery::ModelInfo);
        panel.finish(
            ServiceQuery::ModelInfo,
            Err(DetectorError::Request("Request failed with status code 503".into())),
        );
        assert_eq!(
            panel.reply(ServiceQuery::ModelInfo),
            Some(&Err("Request failed with status code 503".to_string()))
        );
        assert!(panel.reply(ServiceQuery::Health).is_none());
    }
}
