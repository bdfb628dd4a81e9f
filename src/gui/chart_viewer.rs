//! Chart Viewer Widget
//! Central panel with the KPI row and one tab per dashboard objective.

use crate::charts::ChartPlotter;
use crate::dashboard::{Dashboard, DashboardView};
use crate::data::Metric;
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;
const ACCENT: Color32 = Color32::from_rgb(100, 149, 237);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerTab {
    #[default]
    AnnualTrends,
    Correlation,
    Regional,
    Report,
}

impl ViewerTab {
    const ALL: [ViewerTab; 4] = [
        ViewerTab::AnnualTrends,
        ViewerTab::Correlation,
        ViewerTab::Regional,
        ViewerTab::Report,
    ];

    fn title(self) -> &'static str {
        match self {
            ViewerTab::AnnualTrends => "📈 Objective 1: Annual Trends",
            ViewerTab::Correlation => "🔗 Objective 2: Correlation",
            ViewerTab::Regional => "🗺 Objective 3: Regional",
            ViewerTab::Report => "📄 Report",
        }
    }
}

/// Tabbed chart display for the current selection.
#[derive(Default)]
pub struct ChartViewer {
    pub tab: ViewerTab,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, dashboard: &Dashboard) {
        let Some(view) = dashboard.view() else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        Self::draw_kpis(ui, view);
        ui.add_space(CARD_SPACING);

        ui.horizontal(|ui| {
            for tab in ViewerTab::ALL {
                ui.selectable_value(&mut self.tab, tab, RichText::new(tab.title()).size(14.0));
            }
        });
        ui.separator();

        if view.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("No records match the current filters")
                        .size(18.0)
                        .color(Color32::GRAY),
                );
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match self.tab {
                ViewerTab::AnnualTrends => Self::draw_trends(ui, view),
                ViewerTab::Correlation => Self::draw_correlation(ui, view),
                ViewerTab::Regional => Self::draw_regional(ui, view),
                ViewerTab::Report => Self::draw_report(ui, dashboard),
            });
    }

    fn draw_kpis(ui: &mut egui::Ui, view: &DashboardView) {
        let summary = &view.summary;
        let kpis = [
            ("Records", summary.rows.to_string()),
            ("States", summary.states.to_string()),
            ("Years", summary.year_span_label()),
            ("Stations", summary.stations.to_string()),
        ];

        ui.columns(kpis.len(), |columns| {
            for (ui, (label, value)) in columns.iter_mut().zip(kpis) {
                egui::Frame::none()
                    .rounding(8.0)
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.vertical_centered(|ui| {
                            ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                            ui.label(RichText::new(value).size(22.0).strong().color(ACCENT));
                        });
                    });
            }
        });
    }

    /// Titled card around one chart.
    fn card(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(16.0).strong());
                ui.add_space(6.0);
                add_contents(ui);
            });
        ui.add_space(CARD_SPACING);
    }

    fn draw_trends(ui: &mut egui::Ui, view: &DashboardView) {
        for metric in Metric::ALL {
            Self::card(ui, &format!("Annual Average {}", metric.label()), |ui| {
                ChartPlotter::draw_trend_chart(ui, &view.yearly, metric);
            });
        }
    }

    fn draw_correlation(ui: &mut egui::Ui, view: &DashboardView) {
        let states = view.filtered.states();
        for y in [Metric::Rainfall, Metric::Humidity] {
            Self::card(ui, &format!("Avg Temperature vs {}", y.label()), |ui| {
                ChartPlotter::draw_scatter_chart(ui, &view.filtered, &states, Metric::AvgTemp, y);
            });
        }

        Self::card(ui, "Correlation Matrix", |ui| {
            ChartPlotter::draw_correlation_heatmap(ui, &view.correlation);
            if let Some((a, b, r)) = view.correlation.strongest_pair() {
                ui.add_space(6.0);
                ui.label(
                    RichText::new(format!(
                        "Strongest relationship: {} and {} (r = {:.2})",
                        a.label(),
                        b.label(),
                        r
                    ))
                    .color(Color32::GRAY),
                );
            }
        });
    }

    fn draw_regional(ui: &mut egui::Ui, view: &DashboardView) {
        for metric in [Metric::Rainfall, Metric::AvgTemp, Metric::Humidity] {
            Self::card(ui, &format!("Average {} by State", metric.label()), |ui| {
                ChartPlotter::draw_state_bars(ui, &view.by_state, metric);
            });
        }
    }

    fn draw_report(ui: &mut egui::Ui, dashboard: &Dashboard) {
        match dashboard.report() {
            Ok(text) => {
                Self::card(ui, "Report Outline", |ui| {
                    ui.label(RichText::new(text).monospace());
                });
            }
            Err(e) => {
                ui.label(RichText::new(e.to_string()).color(Color32::GRAY));
            }
        }
    }
}
