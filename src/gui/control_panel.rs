//! Control Panel Widget
//! Left side panel with the upload, filter and export controls.

use crate::dashboard::Dashboard;
use egui::{Color32, RichText, ScrollArea};

/// Label shown for rows without a state.
const UNKNOWN_STATE: &str = "(unknown)";

/// Left side control panel with file selection and filters.
pub struct ControlPanel {
    pub status: String,
    pub is_error: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            status: "Please upload a climate CSV (e.g. malaysia_climate.csv)".to_string(),
            is_error: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.is_error = false;
    }

    pub fn set_error(&mut self, error: &str) {
        self.status = format!("Error: {}", error);
        self.is_error = true;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, dashboard: &Dashboard) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌦 Malaysia Climate")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Temperature · Rainfall · Humidity")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = dashboard
                        .dataset()
                        .map(|d| d.source_name.clone())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&name).size(12.0).color(
                        if dashboard.dataset().is_some() {
                            ui.visuals().strong_text_color()
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });

                if let Some(dataset) = dashboard.dataset() {
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(dataset.report.summary())
                            .size(10.5)
                            .color(Color32::GRAY),
                    );
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        let filters = dashboard.dataset().zip(dashboard.selection());
        match filters {
            Some((dataset, selection)) => {
                if let Some((min_year, max_year)) = dataset.table.year_span() {
                    let mut from = selection.from_year;
                    let mut to = selection.to_year;

                    let from_changed = ui
                        .add(egui::Slider::new(&mut from, min_year..=max_year).text("From"))
                        .changed();
                    let to_changed = ui
                        .add(egui::Slider::new(&mut to, min_year..=max_year).text("To"))
                        .changed();

                    if from_changed || to_changed {
                        // Keep the range ordered around the slider being dragged.
                        if from > to {
                            if from_changed {
                                to = from;
                            } else {
                                from = to;
                            }
                        }
                        action = ControlPanelAction::YearRangeChanged(from, to);
                    }
                }

                ui.add_space(8.0);
                ui.label("States:");
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(5.0)
                    .inner_margin(5.0)
                    .show(ui, |ui| {
                        ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                            for state in dataset.table.states() {
                                let mut checked = selection.states.contains(&state);
                                let label = if state.is_empty() {
                                    UNKNOWN_STATE
                                } else {
                                    state.as_str()
                                };
                                if ui.checkbox(&mut checked, label).changed() {
                                    action = ControlPanelAction::StateToggled(state.clone(), checked);
                                }
                            }
                        });
                    });

                ui.add_space(5.0);
                ui.horizontal(|ui| {
                    if ui.small_button("Select All").clicked() {
                        action = ControlPanelAction::SelectAllStates;
                    }
                    if ui.small_button("Clear All").clicked() {
                        action = ControlPanelAction::ClearStates;
                    }
                });
            }
            None => {
                ui.label(RichText::new("Load a dataset to filter").color(Color32::GRAY));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        let has_rows = dashboard.view().is_some_and(|v| !v.is_empty());
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(dashboard.view().is_some(), |ui| {
                let button = egui::Button::new(RichText::new("⬇ Download CSV").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCsv;
                }
            });

            ui.add_space(6.0);

            ui.add_enabled_ui(has_rows, |ui| {
                let charts = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(charts).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }

                ui.add_space(6.0);

                let report = egui::Button::new(RichText::new("📄 Save Report").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(report).clicked() {
                    action = ControlPanelAction::ExportReport;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.is_error {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    YearRangeChanged(i32, i32),
    StateToggled(String, bool),
    SelectAllStates,
    ClearStates,
    ExportCsv,
    ExportCharts,
    ExportReport,
}
