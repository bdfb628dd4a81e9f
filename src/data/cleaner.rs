//! Climate Cleaner Module
//! Relabels an upload to the canonical schema, coerces numeric cells, drops
//! incomplete and out-of-range rows and removes duplicate observations.

use crate::data::coercion::CoercionRules;
use crate::data::loader::RawTable;
use crate::data::record::{ClimateRecord, ClimateTable, CANONICAL_COLUMNS};
use crate::error::{DashboardError, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Columns a labeled upload must carry.
const REQUIRED_LABELS: [&str; 6] = [
    "State",
    "Year",
    "MinTemp_C",
    "MaxTemp_C",
    "Rainfall_mm",
    "Humidity_pct",
];

/// How upload columns map onto the canonical schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Exactly nine columns in DOSM order, relabelled by position.
    Positional,
    /// Columns already carry canonical names.
    Labeled,
    /// Labeled when every required name is present, positional otherwise.
    #[default]
    Auto,
}

/// Physical limits a cleaned record must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub min_temp_floor: f64,
    pub max_temp_ceiling: f64,
    pub humidity_min: f64,
    pub humidity_max: f64,
    pub rainfall_min: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_temp_floor: 5.0,
            max_temp_ceiling: 45.0,
            humidity_min: 0.0,
            humidity_max: 100.0,
            rainfall_min: 0.0,
        }
    }
}

impl Bounds {
    pub fn accepts(&self, record: &ClimateRecord) -> bool {
        record.min_temp_c >= self.min_temp_floor
            && record.max_temp_c <= self.max_temp_ceiling
            && record.humidity_pct >= self.humidity_min
            && record.humidity_pct <= self.humidity_max
            && record.rainfall_mm >= self.rainfall_min
    }
}

/// Row counts for each cleaning stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub parse_failures: usize,
    pub negative_values: usize,
    pub dropped_missing: usize,
    pub dropped_out_of_bounds: usize,
    pub dropped_duplicates: usize,
    pub output_rows: usize,
}

impl CleaningReport {
    pub fn summary(&self) -> String {
        format!(
            "{} of {} rows kept ({} incomplete, {} out of range, {} duplicates, {} unparseable cells)",
            self.output_rows,
            self.input_rows,
            self.dropped_missing,
            self.dropped_out_of_bounds,
            self.dropped_duplicates,
            self.parse_failures
        )
    }
}

/// Column positions resolved against the upload header.
struct ColumnMap {
    state: usize,
    station: Option<usize>,
    altitude: Option<usize>,
    year: usize,
    min_temp: usize,
    max_temp: usize,
    rainfall: usize,
    rain_days: Option<usize>,
    humidity: usize,
}

impl ColumnMap {
    fn positional(raw: &RawTable) -> Result<Self> {
        if raw.width() != CANONICAL_COLUMNS.len() {
            warn!(
                "Upload has {} columns, positional layout needs {}",
                raw.width(),
                CANONICAL_COLUMNS.len()
            );
            return Err(DashboardError::column_count(
                CANONICAL_COLUMNS.len(),
                raw.width(),
            ));
        }

        Ok(Self {
            state: 0,
            station: Some(1),
            altitude: Some(2),
            year: 3,
            min_temp: 4,
            max_temp: 5,
            rainfall: 6,
            rain_days: Some(7),
            humidity: 8,
        })
    }

    fn labeled(raw: &RawTable) -> Result<Self> {
        let required = |name: &str| {
            raw.column_index(name)
                .ok_or_else(|| DashboardError::SchemaMismatch {
                    expected: format!("a '{name}' column"),
                    found: raw.headers().join(", "),
                })
        };

        Ok(Self {
            state: required("State")?,
            station: raw.column_index("Station"),
            altitude: raw.column_index("Altitude_m"),
            year: required("Year")?,
            min_temp: required("MinTemp_C")?,
            max_temp: required("MaxTemp_C")?,
            rainfall: required("Rainfall_mm")?,
            rain_days: raw.column_index("RainDays"),
            humidity: required("Humidity_pct")?,
        })
    }

    fn resolve(raw: &RawTable, layout: LayoutMode) -> Result<Self> {
        match layout {
            LayoutMode::Positional => Self::positional(raw),
            LayoutMode::Labeled => Self::labeled(raw),
            LayoutMode::Auto => {
                let has_labels = REQUIRED_LABELS
                    .iter()
                    .all(|name| raw.column_index(name).is_some());
                if has_labels {
                    debug!("Header carries canonical names, reading by label");
                    Self::labeled(raw)
                } else {
                    Self::positional(raw)
                }
            }
        }
    }
}

/// Turns a raw upload into a validated [`ClimateTable`].
pub struct ClimateCleaner<'a> {
    rules: &'a CoercionRules,
    bounds: &'a Bounds,
    layout: LayoutMode,
}

impl<'a> ClimateCleaner<'a> {
    pub fn new(rules: &'a CoercionRules, bounds: &'a Bounds, layout: LayoutMode) -> Self {
        Self {
            rules,
            bounds,
            layout,
        }
    }

    /// Run the whole pipeline: relabel, coerce, drop incomplete rows, derive
    /// `AvgTemp_C`, apply bounds, drop duplicates.
    pub fn clean(&self, raw: &RawTable) -> Result<(ClimateTable, CleaningReport)> {
        let columns = ColumnMap::resolve(raw, self.layout)?;
        let mut report = CleaningReport {
            input_rows: raw.height(),
            ..CleaningReport::default()
        };

        let mut seen: HashSet<(String, String, i32)> = HashSet::new();
        let mut records = Vec::with_capacity(raw.height());

        for row in 0..raw.height() {
            let Some(record) = self.parse_row(raw, row, &columns, &mut report) else {
                report.dropped_missing += 1;
                continue;
            };

            if !self.bounds.accepts(&record) {
                report.dropped_out_of_bounds += 1;
                continue;
            }

            let key = (record.state.clone(), record.station.clone(), record.year);
            if !seen.insert(key) {
                report.dropped_duplicates += 1;
                continue;
            }

            records.push(record);
        }

        report.output_rows = records.len();
        info!("Cleaning finished: {}", report.summary());
        if report.negative_values > 0 {
            warn!(
                "{} negative numeric cells kept as negative; set legacy_strip_hyphens to treat hyphens as noise",
                report.negative_values
            );
        }

        Ok((ClimateTable::new(records), report))
    }

    /// `None` when an essential column is missing.
    fn parse_row(
        &self,
        raw: &RawTable,
        row: usize,
        columns: &ColumnMap,
        report: &mut CleaningReport,
    ) -> Option<ClimateRecord> {
        let mut number = |column: Option<usize>| -> Option<f64> {
            let text = raw.cell(row, column?)?;
            match self.rules.parse_cell(text) {
                Ok(Some(value)) => {
                    if value < 0.0 {
                        report.negative_values += 1;
                    }
                    Some(value)
                }
                Ok(None) => None,
                Err(e) => {
                    debug!("Row {}: {}", row + 1, e);
                    report.parse_failures += 1;
                    None
                }
            }
        };

        let altitude_m = number(columns.altitude);
        let min_temp_c = number(Some(columns.min_temp));
        let max_temp_c = number(Some(columns.max_temp));
        let rainfall_mm = number(Some(columns.rainfall));
        let rain_days = number(columns.rain_days);
        let humidity_pct = number(Some(columns.humidity));

        let year = match raw.cell(row, columns.year).map(|t| self.rules.parse_integral(t)) {
            Some(Ok(year)) => year,
            Some(Err(e)) => {
                debug!("Row {}: {}", row + 1, e);
                report.parse_failures += 1;
                None
            }
            None => None,
        };

        let (min_temp_c, max_temp_c) = (min_temp_c?, max_temp_c?);
        Some(ClimateRecord {
            state: text_cell(raw, row, Some(columns.state)),
            station: text_cell(raw, row, columns.station),
            altitude_m,
            year: year?,
            min_temp_c,
            max_temp_c,
            rainfall_mm: rainfall_mm?,
            rain_days,
            humidity_pct: humidity_pct?,
            avg_temp_c: (min_temp_c + max_temp_c) / 2.0,
        })
    }
}

fn text_cell(raw: &RawTable, row: usize, column: Option<usize>) -> String {
    column
        .and_then(|c| raw.cell(row, c))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positional(rows: &[Vec<Option<&str>>]) -> RawTable {
        RawTable::from_rows(
            &["c1", "c2", "c3", "c4", "c5", "c6", "c7", "c8", "c9"],
            rows,
        )
    }

    fn row<'a>(cells: [&'a str; 9]) -> Vec<Option<&'a str>> {
        cells.iter().map(|c| Some(*c)).collect()
    }

    fn clean(raw: &RawTable) -> (ClimateTable, CleaningReport) {
        let rules = CoercionRules::default();
        let bounds = Bounds::default();
        ClimateCleaner::new(&rules, &bounds, LayoutMode::Auto)
            .clean(raw)
            .unwrap()
    }

    #[test]
    fn test_reference_row() {
        let raw = positional(&[row([
            "Selangor", "KLIA", "16", "2010", "24", "33", "150,5", "12", "80",
        ])]);
        let (table, report) = clean(&raw);

        assert_eq!(report.output_rows, 1);
        assert_eq!(
            table.records()[0],
            ClimateRecord {
                state: "Selangor".to_string(),
                station: "KLIA".to_string(),
                altitude_m: Some(16.0),
                year: 2010,
                min_temp_c: 24.0,
                max_temp_c: 33.0,
                rainfall_mm: 150.5,
                rain_days: Some(12.0),
                humidity_pct: 80.0,
                avg_temp_c: 28.5,
            }
        );
    }

    #[test]
    fn test_out_of_range_rows_dropped() {
        let raw = positional(&[
            row(["Perak", "Ipoh", "40", "2011", "23", "33", "200", "14", "105"]),
            row(["Perak", "Ipoh", "40", "2012", "4", "33", "200", "14", "80"]),
            row(["Perak", "Ipoh", "40", "2013", "23", "46", "200", "14", "80"]),
            row(["Perak", "Ipoh", "40", "2014", "23", "33", "-5", "14", "80"]),
            row(["Perak", "Ipoh", "40", "2015", "23", "33", "200", "14", "80"]),
        ]);
        let (table, report) = clean(&raw);

        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].year, 2015);
        assert_eq!(report.dropped_out_of_bounds, 4);
        assert_eq!(report.negative_values, 1);
    }

    #[test]
    fn test_incomplete_rows_dropped() {
        let mut missing_humidity = row(["Kedah", "Alor Setar", "4", "2010", "23", "33", "180", "10", ""]);
        missing_humidity[8] = None;
        let raw = positional(&[
            missing_humidity,
            row(["Kedah", "Alor Setar", "4", "abc", "23", "33", "180", "10", "82"]),
            row(["Kedah", "Alor Setar", "-", "2011", "23", "33", "180", "-", "82"]),
        ]);
        let (table, report) = clean(&raw);

        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].altitude_m, None);
        assert_eq!(table.records()[0].rain_days, None);
        assert_eq!(report.dropped_missing, 2);
        assert_eq!(report.parse_failures, 1);
    }

    #[test]
    fn test_duplicates_keep_first() {
        let raw = positional(&[
            row(["Johor", "Senai", "37", "2010", "23", "32", "210", "15", "84"]),
            row(["Johor", "Senai", "37", "2010", "24", "33", "999", "15", "84"]),
            row(["Johor", "Batu Pahat", "3", "2010", "23", "32", "190", "15", "84"]),
        ]);
        let (table, report) = clean(&raw);

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].rainfall_mm, 210.0);
        assert_eq!(report.dropped_duplicates, 1);
    }

    #[test]
    fn test_positional_width_mismatch() {
        let raw = RawTable::from_rows(&["a", "b"], &[vec![Some("1"), Some("2")]]);
        let rules = CoercionRules::default();
        let bounds = Bounds::default();
        let result = ClimateCleaner::new(&rules, &bounds, LayoutMode::Positional).clean(&raw);
        assert!(matches!(result, Err(DashboardError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_labeled_layout_uses_names() {
        let raw = RawTable::from_rows(
            &["Year", "State", "Humidity_pct", "Rainfall_mm", "MaxTemp_C", "MinTemp_C"],
            &[vec![
                Some("2019"),
                Some(" Sabah "),
                Some("85"),
                Some("300"),
                Some("32"),
                Some("23"),
            ]],
        );
        let (table, _) = clean(&raw);
        let record = &table.records()[0];

        assert_eq!(record.state, "Sabah");
        assert_eq!(record.station, "");
        assert_eq!(record.avg_temp_c, 27.5);
        assert_eq!(record.rain_days, None);
    }

    #[test]
    fn test_labeled_layout_missing_column() {
        let raw = RawTable::from_rows(&["State", "Year"], &[vec![Some("Sabah"), Some("2019")]]);
        let rules = CoercionRules::default();
        let bounds = Bounds::default();
        let result = ClimateCleaner::new(&rules, &bounds, LayoutMode::Labeled).clean(&raw);
        assert!(matches!(result, Err(DashboardError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_labeled_layout_rederives_average() {
        let raw = RawTable::from_rows(
            &[
                "State",
                "Year",
                "MinTemp_C",
                "MaxTemp_C",
                "Rainfall_mm",
                "Humidity_pct",
                "AvgTemp_C",
            ],
            &[vec![
                Some("Sabah"),
                Some("2019"),
                Some("23"),
                Some("32"),
                Some("300"),
                Some("85"),
                Some("27.4"),
            ]],
        );
        let (table, _) = clean(&raw);
        assert_eq!(table.records()[0].avg_temp_c, 27.5);
    }
}
