//! Climate Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::dashboard::Dashboard;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use log::{error, info, warn};
use std::path::Path;

/// Main application window.
pub struct ClimateApp {
    dashboard: Dashboard,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl ClimateApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dashboard: Dashboard) -> Self {
        let mut control_panel = ControlPanel::new();
        if let Some(dataset) = dashboard.dataset() {
            control_panel.set_status(&format!(
                "Loaded {}: {}",
                dataset.source_name,
                dataset.report.summary()
            ));
        }

        Self {
            dashboard,
            control_panel,
            chart_viewer: ChartViewer::new(),
        }
    }

    fn report_error(&mut self, context: &str, e: impl std::fmt::Display) {
        error!("{context}: {e}");
        self.control_panel.set_error(&e.to_string());
    }

    fn load(&mut self, path: &Path) {
        match self.dashboard.load_path(path) {
            Ok(dataset) => {
                let status = format!("Loaded {}: {}", dataset.source_name, dataset.report.summary());
                self.control_panel.set_status(&status);
            }
            Err(e) => self.report_error("Upload failed", e),
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.load(&path);
        }
    }

    fn handle_export_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&self.dashboard.config().export.csv_file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match self.dashboard.export_csv(&path) {
            Ok(()) => self
                .control_panel
                .set_status(&format!("CSV saved to {}", path.display())),
            Err(e) => self.report_error("CSV export failed", e),
        }
    }

    /// Render every chart to PNG in a chosen folder, then reveal it.
    fn handle_export_charts(&mut self) {
        let Some(view) = self.dashboard.view() else {
            return;
        };
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        let export = &self.dashboard.config().export;
        let renderer = StaticChartRenderer::new(export.image_width, export.image_height);
        match renderer.export_all(view, &dir) {
            Ok(paths) => {
                self.control_panel.set_status(&format!(
                    "Exported {} charts to {}",
                    paths.len(),
                    dir.display()
                ));
                if let Err(e) = open::that(&dir) {
                    warn!("Could not open {}: {}", dir.display(), e);
                }
            }
            Err(e) => self.report_error("Chart export failed", e),
        }
    }

    fn handle_export_report(&mut self) {
        let report = match self.dashboard.report() {
            Ok(report) => report,
            Err(e) => return self.report_error("Report failed", e),
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("Markdown", &["md"])
            .set_file_name(&self.dashboard.config().export.report_file_name)
            .save_file()
        else {
            return;
        };

        match std::fs::write(&path, report) {
            Ok(()) => {
                info!("Report written to {}", path.display());
                self.control_panel
                    .set_status(&format!("Report saved to {}", path.display()));
            }
            Err(e) => self.report_error("Report failed", e),
        }
    }
}

impl eframe::App for ClimateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &self.dashboard);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::YearRangeChanged(from, to) => {
                            self.dashboard.set_year_range(from, to)
                        }
                        ControlPanelAction::StateToggled(state, selected) => {
                            self.dashboard.set_state(&state, selected)
                        }
                        ControlPanelAction::SelectAllStates => self.dashboard.select_all_states(),
                        ControlPanelAction::ClearStates => self.dashboard.clear_states(),
                        ControlPanelAction::ExportCsv => self.handle_export_csv(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::ExportReport => self.handle_export_report(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &self.dashboard);
        });
    }
}
