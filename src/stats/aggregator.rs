//! Group-by means and headline figures over a filtered table.

use crate::data::{ClimateTable, Metric};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use std::fmt;

/// Column to group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Year,
    State,
}

/// Value of the grouping column for one aggregate row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum GroupValue {
    Year(i32),
    State(String),
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Year(year) => write!(f, "{year}"),
            GroupValue::State(state) => f.write_str(state),
        }
    }
}

/// Means of the three charted variables within one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMeans {
    pub key: GroupValue,
    pub count: usize,
    pub avg_temp_c: f64,
    pub rainfall_mm: f64,
    pub humidity_pct: f64,
}

impl GroupMeans {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::AvgTemp => self.avg_temp_c,
            Metric::Rainfall => self.rainfall_mm,
            Metric::Humidity => self.humidity_pct,
        }
    }

    /// Year of a year-grouped row.
    pub fn year(&self) -> Option<i32> {
        match self.key {
            GroupValue::Year(year) => Some(year),
            GroupValue::State(_) => None,
        }
    }
}

/// KPI row shown above the charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub rows: usize,
    pub states: usize,
    pub year_span: Option<(i32, i32)>,
    pub stations: usize,
}

impl Summary {
    pub fn year_span_label(&self) -> String {
        match self.year_span {
            Some((from, to)) => format!("{from}–{to}"),
            None => "-".to_string(),
        }
    }
}

pub struct Aggregator;

impl Aggregator {
    /// One row per distinct key, ascending by key. Empty for an empty table.
    pub fn group_means(table: &ClimateTable, key: GroupKey) -> Vec<GroupMeans> {
        let mut groups: BTreeMap<GroupValue, [Vec<f64>; 3]> = BTreeMap::new();

        for record in table.records() {
            let value = match key {
                GroupKey::Year => GroupValue::Year(record.year),
                GroupKey::State => GroupValue::State(record.state.clone()),
            };
            let columns = groups.entry(value).or_default();
            for (column, metric) in columns.iter_mut().zip(Metric::ALL) {
                column.push(record.metric(metric));
            }
        }

        groups
            .into_iter()
            .map(|(key, [temp, rain, humidity])| GroupMeans {
                key,
                count: temp.len(),
                avg_temp_c: temp.mean(),
                rainfall_mm: rain.mean(),
                humidity_pct: humidity.mean(),
            })
            .collect()
    }

    /// Rows re-sorted by one metric, largest first, for bar charts.
    pub fn ranked(rows: &[GroupMeans], metric: Metric) -> Vec<GroupMeans> {
        let mut ranked = rows.to_vec();
        ranked.sort_by(|a, b| {
            b.metric(metric)
                .partial_cmp(&a.metric(metric))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    pub fn summary(table: &ClimateTable) -> Summary {
        Summary {
            rows: table.len(),
            states: table.states().len(),
            year_span: table.year_span(),
            stations: table.station_count(),
        }
    }
}
