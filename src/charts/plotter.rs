//! Chart Plotter Module
//! Creates the interactive dashboard charts using egui_plot.

use crate::data::{ClimateTable, Metric};
use crate::stats::{Aggregator, CorrelationMatrix, GroupMeans};
use egui::{Align2, Color32, FontId, RichText, Sense};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

/// Color palette for states
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

const TREND_COLOR: Color32 = Color32::from_rgb(52, 152, 219);
const BAR_COLOR: Color32 = Color32::from_rgb(91, 155, 213);

// Diverging scale endpoints (negative, zero, positive)
const COLD: [f32; 3] = [59.0, 76.0, 192.0];
const NEUTRAL: [f32; 3] = [221.0, 221.0, 221.0];
const WARM: [f32; 3] = [180.0, 4.0, 38.0];

/// Creates the dashboard visualizations using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the state at `index` in the sorted state list.
    pub fn state_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Diverging blue-white-red color for a correlation in [-1, 1].
    pub fn coolwarm(r: f64) -> Color32 {
        if r.is_nan() {
            return Color32::GRAY;
        }
        let t = r.clamp(-1.0, 1.0) as f32;
        let (from, to, f) = if t < 0.0 {
            (NEUTRAL, COLD, -t)
        } else {
            (NEUTRAL, WARM, t)
        };
        let channel = |i: usize| (from[i] + (to[i] - from[i]) * f).round() as u8;
        Color32::from_rgb(channel(0), channel(1), channel(2))
    }

    /// Objective 1: yearly mean of one metric, line with markers.
    pub fn draw_trend_chart(ui: &mut egui::Ui, yearly: &[GroupMeans], metric: Metric) {
        let points: Vec<[f64; 2]> = yearly
            .iter()
            .filter_map(|row| Some([row.year()? as f64, row.metric(metric)]))
            .collect();

        Plot::new(format!("trend_{}", metric.column()))
            .height(220.0)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(metric.unit())
            .x_axis_formatter(|mark, _range| {
                if mark.value.fract() == 0.0 {
                    format!("{:.0}", mark.value)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(TREND_COLOR)
                        .width(2.0)
                        .name(metric.label()),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(TREND_COLOR),
                );
            });
    }

    /// Objective 2: one metric against another, colored by state.
    pub fn draw_scatter_chart(
        ui: &mut egui::Ui,
        table: &ClimateTable,
        states: &[String],
        x: Metric,
        y: Metric,
    ) {
        Plot::new(format!("scatter_{}_{}", x.column(), y.column()))
            .height(320.0)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label(x.axis_title())
            .y_axis_label(y.axis_title())
            .show(ui, |plot_ui| {
                for (i, state) in states.iter().enumerate() {
                    let points: PlotPoints = table
                        .records()
                        .iter()
                        .filter(|r| &r.state == state)
                        .map(|r| [r.metric(x), r.metric(y)])
                        .collect();
                    if points.points().is_empty() {
                        continue;
                    }

                    plot_ui.points(
                        Points::new(points)
                            .radius(3.5)
                            .color(Self::state_color(i).gamma_multiply(0.7))
                            .name(state),
                    );
                }
            });
    }

    /// Objective 2: annotated correlation matrix.
    pub fn draw_correlation_heatmap(ui: &mut egui::Ui, matrix: &CorrelationMatrix) {
        let cell = egui::vec2(96.0, 44.0);

        egui::Grid::new("correlation_heatmap")
            .spacing([2.0, 2.0])
            .show(ui, |ui| {
                ui.label("");
                for metric in Metric::ALL {
                    ui.label(RichText::new(metric.column()).strong().size(11.0));
                }
                ui.end_row();

                for a in Metric::ALL {
                    ui.label(RichText::new(a.column()).strong().size(11.0));
                    for b in Metric::ALL {
                        let r = matrix.get(a, b);
                        let (rect, response) = ui.allocate_exact_size(cell, Sense::hover());
                        let painter = ui.painter();
                        painter.rect_filled(rect, 2.0, Self::coolwarm(r));
                        let text = if r.is_nan() {
                            "n/a".to_string()
                        } else {
                            format!("{r:.2}")
                        };
                        let text_color = if r.abs() > 0.6 {
                            Color32::WHITE
                        } else {
                            Color32::BLACK
                        };
                        painter.text(
                            rect.center(),
                            Align2::CENTER_CENTER,
                            text,
                            FontId::proportional(15.0),
                            text_color,
                        );
                        response.on_hover_text(format!("{} vs {}", a.label(), b.label()));
                    }
                    ui.end_row();
                }
            });
    }

    /// Objective 3: horizontal bars of one metric by state, largest on top.
    pub fn draw_state_bars(ui: &mut egui::Ui, by_state: &[GroupMeans], metric: Metric) {
        let ranked = Aggregator::ranked(by_state, metric);
        let n = ranked.len();
        // Bar i (ranked) sits at y = n - 1 - i so the largest value is on top.
        let labels: Vec<String> = ranked.iter().rev().map(|r| r.key.to_string()).collect();

        let bars: Vec<Bar> = ranked
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new((n - 1 - i) as f64, row.metric(metric))
                    .name(row.key.to_string())
                    .fill(BAR_COLOR)
                    .width(0.7)
            })
            .collect();

        Plot::new(format!("state_bars_{}", metric.column()))
            .height((n as f32 * 26.0).max(160.0))
            .allow_scroll(false)
            .allow_drag(false)
            .x_axis_label(metric.unit())
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().color(BAR_COLOR));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coolwarm_endpoints() {
        assert_eq!(ChartPlotter::coolwarm(0.0), Color32::from_rgb(221, 221, 221));
        assert_eq!(ChartPlotter::coolwarm(1.0), Color32::from_rgb(180, 4, 38));
        assert_eq!(ChartPlotter::coolwarm(-1.0), Color32::from_rgb(59, 76, 192));
        assert_eq!(ChartPlotter::coolwarm(f64::NAN), Color32::GRAY);
    }

    #[test]
    fn test_state_colors_cycle() {
        assert_eq!(ChartPlotter::state_color(0), ChartPlotter::state_color(10));
        assert_ne!(ChartPlotter::state_color(0), ChartPlotter::state_color(1));
    }
}
