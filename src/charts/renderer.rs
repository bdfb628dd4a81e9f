//! Static Chart Renderer
//! Renders the dashboard charts to PNG files with plotters.
//!
//! Output set (one file each):
//! 1. Annual trend lines for temperature, rainfall and humidity
//! 2. Temperature vs rainfall / humidity scatter plots, colored by state
//! 3. Correlation matrix heatmap
//! 4. State bar charts for the three variables, largest first

use crate::charts::{ChartPlotter, PALETTE};
use crate::dashboard::DashboardView;
use crate::data::{ClimateTable, Metric};
use crate::error::{DashboardError, Result};
use crate::stats::{Aggregator, CorrelationMatrix, GroupMeans};
use log::info;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

const FONT: &str = "sans-serif";

fn render_err<E: std::fmt::Display>(e: E) -> DashboardError {
    DashboardError::Render(e.to_string())
}

fn rgb(color: egui::Color32) -> RGBColor {
    RGBColor(color.r(), color.g(), color.b())
}

/// Pad a value range so points never sit on the frame.
fn padded(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.1;
    (min - pad, max + pad)
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    padded(min, max)
}

/// Year axis tick text; ticks between whole years stay blank.
fn year_label(x: &f64) -> String {
    if x.fract() == 0.0 {
        format!("{:.0}", x)
    } else {
        String::new()
    }
}

fn file_stem(metric: Metric) -> &'static str {
    match metric {
        Metric::AvgTemp => "temperature",
        Metric::Rainfall => "rainfall",
        Metric::Humidity => "humidity",
    }
}

pub struct StaticChartRenderer {
    width: u32,
    height: u32,
}

impl StaticChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Render every chart of `view` into `dir`, returning the written paths.
    pub fn export_all(&self, view: &DashboardView, dir: &Path) -> Result<Vec<PathBuf>> {
        view.filtered.require_non_empty()?;
        std::fs::create_dir_all(dir).map_err(|e| DashboardError::io(dir, e))?;

        let mut written = Vec::new();

        for metric in Metric::ALL {
            let path = dir.join(format!("annual_{}.png", file_stem(metric)));
            self.render_trend(&path, &view.yearly, metric)?;
            written.push(path);
        }

        let states = view.filtered.states();
        for y in [Metric::Rainfall, Metric::Humidity] {
            let path = dir.join(format!("scatter_temperature_{}.png", file_stem(y)));
            self.render_scatter(&path, &view.filtered, &states, Metric::AvgTemp, y)?;
            written.push(path);
        }

        let path = dir.join("correlation_matrix.png");
        self.render_heatmap(&path, &view.correlation)?;
        written.push(path);

        for metric in [Metric::Rainfall, Metric::AvgTemp, Metric::Humidity] {
            let path = dir.join(format!("state_{}.png", file_stem(metric)));
            self.render_state_bars(&path, &view.by_state, metric)?;
            written.push(path);
        }

        info!("Rendered {} charts to {}", written.len(), dir.display());
        Ok(written)
    }

    pub fn render_trend(&self, path: &Path, yearly: &[GroupMeans], metric: Metric) -> Result<()> {
        let points: Vec<(f64, f64)> = yearly
            .iter()
            .filter_map(|row| Some((row.year()? as f64, row.metric(metric))))
            .collect();
        let (x0, x1) = value_range(points.iter().map(|p| p.0));
        let (y0, y1) = value_range(points.iter().map(|p| p.1));

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Annual Average {}", metric.label()), (FONT, 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc(metric.unit())
            .x_label_formatter(&year_label)
            .draw()
            .map_err(render_err)?;

        let color = rgb(PALETTE[0]);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(render_err)?;
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 5, color.filled())))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }

    pub fn render_scatter(
        &self,
        path: &Path,
        table: &ClimateTable,
        states: &[String],
        x: Metric,
        y: Metric,
    ) -> Result<()> {
        let (x0, x1) = value_range(table.records().iter().map(|r| r.metric(x)));
        let (y0, y1) = value_range(table.records().iter().map(|r| r.metric(y)));

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Avg Temperature vs {}", y.label()),
                (FONT, 26),
            )
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc(x.axis_title())
            .y_desc(y.axis_title())
            .draw()
            .map_err(render_err)?;

        for (i, state) in states.iter().enumerate() {
            let color = rgb(ChartPlotter::state_color(i));
            let points: Vec<(f64, f64)> = table
                .records()
                .iter()
                .filter(|r| &r.state == state)
                .map(|r| (r.metric(x), r.metric(y)))
                .collect();

            chart
                .draw_series(
                    points
                        .into_iter()
                        .map(move |p| Circle::new(p, 4, color.mix(0.7).filled())),
                )
                .map_err(render_err)?
                .label(state.as_str())
                .legend(move |(lx, ly)| Circle::new((lx, ly), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 12))
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }

    pub fn render_heatmap(&self, path: &Path, matrix: &CorrelationMatrix) -> Result<()> {
        let side = self.height.min(self.width).max(300);
        let root = BitMapBackend::new(path, (side, side)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        // Column -1..0 holds row labels, row 3..4 holds column labels.
        let mut chart = ChartBuilder::on(&root)
            .caption("Correlation Matrix", (FONT, 26))
            .margin(20)
            .build_cartesian_2d(-1.0f64..3.0f64, 0.0f64..4.0f64)
            .map_err(render_err)?;

        let centered = Pos::new(HPos::Center, VPos::Center);
        let label_style = TextStyle::from((FONT, 14).into_font()).pos(centered);
        let value_style = TextStyle::from((FONT, 18).into_font()).pos(centered);

        for (i, metric) in Metric::ALL.iter().enumerate() {
            let name = metric.column().to_string();
            chart
                .draw_series(std::iter::once(Text::new(
                    name.clone(),
                    (i as f64 + 0.5, 3.5),
                    label_style.clone(),
                )))
                .map_err(render_err)?;
            chart
                .draw_series(std::iter::once(Text::new(
                    name,
                    (-0.5, 2.5 - i as f64),
                    label_style.clone(),
                )))
                .map_err(render_err)?;
        }

        for (i, a) in Metric::ALL.iter().enumerate() {
            for (j, b) in Metric::ALL.iter().enumerate() {
                let r = matrix.get(*a, *b);
                let (cx, cy) = (j as f64, 2.0 - i as f64);
                let fill = rgb(ChartPlotter::coolwarm(r));

                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [(cx + 0.02, cy + 0.02), (cx + 0.98, cy + 0.98)],
                        fill.filled(),
                    )))
                    .map_err(render_err)?;

                let text = if r.is_nan() {
                    "n/a".to_string()
                } else {
                    format!("{r:.2}")
                };
                chart
                    .draw_series(std::iter::once(Text::new(
                        text,
                        (cx + 0.5, cy + 0.5),
                        value_style.clone(),
                    )))
                    .map_err(render_err)?;
            }
        }

        root.present().map_err(render_err)?;
        Ok(())
    }

    pub fn render_state_bars(
        &self,
        path: &Path,
        by_state: &[GroupMeans],
        metric: Metric,
    ) -> Result<()> {
        let ranked = Aggregator::ranked(by_state, metric);
        let n = ranked.len();
        let max = ranked
            .iter()
            .map(|r| r.metric(metric))
            .fold(0.0f64, f64::max);
        let x1 = if max > 0.0 { max * 1.1 } else { 1.0 };
        let labels: Vec<String> = ranked.iter().rev().map(|r| r.key.to_string()).collect();

        let height = self.height.max(n as u32 * 28 + 120);
        let root = BitMapBackend::new(path, (self.width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Average {} by State", metric.label()), (FONT, 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(140)
            .build_cartesian_2d(0.0f64..x1, -0.5f64..(n as f64 - 0.5))
            .map_err(render_err)?;

        let label_for = |y: &f64| {
            let idx = y.round();
            if (y - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        };
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n.max(1))
            .y_label_formatter(&label_for)
            .x_desc(metric.unit())
            .draw()
            .map_err(render_err)?;

        let color = rgb(PALETTE[0]);
        chart
            .draw_series(ranked.iter().enumerate().map(|(i, row)| {
                let y = (n - 1 - i) as f64;
                Rectangle::new([(0.0, y - 0.35), (row.metric(metric), y + 0.35)], color.filled())
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::fixtures::record;

    #[test]
    fn test_padded_ranges() {
        assert_eq!(padded(5.0, 5.0), (4.0, 6.0));
        assert_eq!(padded(f64::INFINITY, f64::NEG_INFINITY), (0.0, 1.0));
        let (lo, hi) = padded(0.0, 10.0);
        assert!((lo + 1.0).abs() < 1e-12 && (hi - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_year_labels_only_on_whole_years() {
        assert_eq!(year_label(&2010.0), "2010");
        assert_eq!(year_label(&2012.0), "2012");
        assert_eq!(year_label(&2010.5), "");
        assert_eq!(year_label(&2011.5), "");
    }

    #[test]
    fn test_export_writes_every_chart() {
        let dir = tempfile::tempdir().unwrap();
        let view = DashboardView::build(ClimateTable::new(vec![
            record("Selangor", "KLIA", 2010, 24.0, 33.0),
            record("Johor", "Senai", 2011, 23.0, 32.0),
            record("Sabah", "Kota Kinabalu", 2012, 24.5, 31.0),
        ]));

        let written = StaticChartRenderer::new(640, 480)
            .export_all(&view, dir.path())
            .unwrap();

        let mut names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "annual_humidity.png",
                "annual_rainfall.png",
                "annual_temperature.png",
                "correlation_matrix.png",
                "scatter_temperature_humidity.png",
                "scatter_temperature_rainfall.png",
                "state_humidity.png",
                "state_rainfall.png",
                "state_temperature.png",
            ]
        );
        for path in &written {
            let size = std::fs::metadata(path).unwrap().len();
            assert!(size > 0, "{} is empty", path.display());
        }
    }

    #[test]
    fn test_export_rejects_empty_view() {
        let dir = tempfile::tempdir().unwrap();
        let view = DashboardView::build(ClimateTable::default());
        let result = StaticChartRenderer::new(800, 600).export_all(&view, dir.path());
        assert!(matches!(result, Err(DashboardError::EmptyResultSet)));
    }
}
