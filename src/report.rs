//! Text report outline for the current selection.
//!
//! The outline follows the dashboard's three objectives and quotes the key
//! figures behind each chart, ready to be pasted into a write-up.

use crate::dashboard::DashboardView;
use crate::data::Metric;
use crate::error::{DashboardError, Result};
use crate::stats::{Aggregator, GroupMeans};
use std::fmt::Write;

pub struct ReportOutline;

impl ReportOutline {
    /// Markdown outline. Fails with `EmptyResultSet` when nothing is selected.
    pub fn render(view: &DashboardView, source_name: &str) -> Result<String> {
        view.filtered.require_non_empty()?;

        let mut out = String::new();
        Self::write_outline(&mut out, view, source_name)
            .map_err(|e| DashboardError::Render(e.to_string()))?;
        Ok(out)
    }

    fn write_outline(out: &mut String, view: &DashboardView, source_name: &str) -> std::fmt::Result {
        let summary = &view.summary;

        writeln!(out, "# Malaysia Climate Report")?;
        writeln!(out)?;
        writeln!(out, "## Dataset")?;
        writeln!(out, "- Source: {source_name}")?;
        writeln!(out, "- Records: {}", summary.rows)?;
        writeln!(out, "- States: {}", summary.states)?;
        writeln!(out, "- Stations: {}", summary.stations)?;
        writeln!(out, "- Years: {}", summary.year_span_label())?;
        writeln!(out)?;

        writeln!(out, "## Objective 1: Annual Climate Trend")?;
        for metric in Metric::ALL {
            writeln!(out, "- {}", Self::trend_line(&view.yearly, metric))?;
        }
        writeln!(out)?;

        writeln!(out, "## Objective 2: Correlation Between Variables")?;
        for (i, a) in Metric::ALL.iter().enumerate() {
            for b in Metric::ALL.iter().skip(i + 1) {
                writeln!(
                    out,
                    "- {} vs {}: r = {}",
                    a.label(),
                    b.label(),
                    format_r(view.correlation.get(*a, *b))
                )?;
            }
        }
        match view.correlation.strongest_pair() {
            Some((a, b, r)) => writeln!(
                out,
                "- Strongest relationship: {} and {} ({})",
                a.label(),
                b.label(),
                if r >= 0.0 { "positive" } else { "negative" }
            )?,
            None => writeln!(out, "- Not enough variation to compute correlations")?,
        }
        writeln!(out)?;

        writeln!(out, "## Objective 3: Regional Climate Comparison by State")?;
        for metric in Metric::ALL {
            let ranked = Aggregator::ranked(&view.by_state, metric);
            if let (Some(top), Some(bottom)) = (ranked.first(), ranked.last()) {
                writeln!(
                    out,
                    "- {}: highest in {} ({:.1} {}), lowest in {} ({:.1} {})",
                    metric.label(),
                    top.key,
                    top.metric(metric),
                    metric.unit(),
                    bottom.key,
                    bottom.metric(metric),
                    metric.unit()
                )?;
            }
        }

        Ok(())
    }

    fn trend_line(yearly: &[GroupMeans], metric: Metric) -> String {
        match (yearly.first(), yearly.last()) {
            (Some(first), Some(last)) if first.key != last.key => {
                let change = last.metric(metric) - first.metric(metric);
                format!(
                    "{}: {:.1} {unit} in {} to {:.1} {unit} in {} ({:+.1} {unit})",
                    metric.label(),
                    first.metric(metric),
                    first.key,
                    last.metric(metric),
                    last.key,
                    change,
                    unit = metric.unit()
                )
            }
            (Some(only), _) => format!(
                "{}: {:.1} {} in {} (single year)",
                metric.label(),
                only.metric(metric),
                metric.unit(),
                only.key
            ),
            _ => format!("{}: no data", metric.label()),
        }
    }
}

fn format_r(r: f64) -> String {
    if r.is_nan() {
        "n/a".to_string()
    } else {
        format!("{r:.2}")
    }
}
