//! Cleaned climate records and the table holding them.

use crate::error::{DashboardError, Result};
use std::collections::BTreeSet;

/// Canonical column names, in the positional order of a raw DOSM upload.
pub const CANONICAL_COLUMNS: [&str; 9] = [
    "State",
    "Station",
    "Altitude_m",
    "Year",
    "MinTemp_C",
    "MaxTemp_C",
    "Rainfall_mm",
    "RainDays",
    "Humidity_pct",
];

/// Derived column appended after the canonical ones.
pub const AVG_TEMP_COLUMN: &str = "AvgTemp_C";

/// One (State, Station, Year) observation after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateRecord {
    pub state: String,
    pub station: String,
    pub altitude_m: Option<f64>,
    pub year: i32,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub rainfall_mm: f64,
    pub rain_days: Option<f64>,
    pub humidity_pct: f64,
    pub avg_temp_c: f64,
}

impl ClimateRecord {
    /// Value of one of the three charted variables.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::AvgTemp => self.avg_temp_c,
            Metric::Rainfall => self.rainfall_mm,
            Metric::Humidity => self.humidity_pct,
        }
    }
}

/// The three variables every chart and aggregate is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    AvgTemp,
    Rainfall,
    Humidity,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::AvgTemp, Metric::Rainfall, Metric::Humidity];

    pub fn column(self) -> &'static str {
        match self {
            Metric::AvgTemp => AVG_TEMP_COLUMN,
            Metric::Rainfall => "Rainfall_mm",
            Metric::Humidity => "Humidity_pct",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::AvgTemp => "Temperature",
            Metric::Rainfall => "Rainfall",
            Metric::Humidity => "Humidity",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::AvgTemp => "°C",
            Metric::Rainfall => "mm",
            Metric::Humidity => "%",
        }
    }

    /// Axis title such as "Avg Temp (°C)".
    pub fn axis_title(self) -> String {
        match self {
            Metric::AvgTemp => format!("Avg Temp ({})", self.unit()),
            _ => format!("{} ({})", self.label(), self.unit()),
        }
    }
}

/// Immutable, ordered collection of cleaned records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClimateTable {
    records: Vec<ClimateRecord>,
}

impl ClimateTable {
    pub fn new(records: Vec<ClimateRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ClimateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fails with `EmptyResultSet` when there is nothing to show.
    pub fn require_non_empty(&self) -> Result<&Self> {
        if self.records.is_empty() {
            Err(DashboardError::EmptyResultSet)
        } else {
            Ok(self)
        }
    }

    /// Inclusive (min, max) year, or `None` for an empty table.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    /// Distinct states, sorted.
    pub fn states(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn station_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.station.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Column of one metric, in record order.
    pub fn metric_values(&self, metric: Metric) -> Vec<f64> {
        self.records.iter().map(|r| r.metric(metric)).collect()
    }
}

impl FromIterator<ClimateRecord> for ClimateTable {
    fn from_iter<I: IntoIterator<Item = ClimateRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::ClimateRecord;

    pub fn record(state: &str, station: &str, year: i32, min: f64, max: f64) -> ClimateRecord {
        ClimateRecord {
            state: state.to_string(),
            station: station.to_string(),
            altitude_m: Some(10.0),
            year,
            min_temp_c: min,
            max_temp_c: max,
            rainfall_mm: 200.0,
            rain_days: Some(15.0),
            humidity_pct: 80.0,
            avg_temp_c: (min + max) / 2.0,
        }
    }
}
