//! Year-range and state selection over a cleaned table.

use crate::data::record::{ClimateRecord, ClimateTable};
use std::collections::BTreeSet;

/// The user's current filter choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub from_year: i32,
    pub to_year: i32,
    pub states: BTreeSet<String>,
}

impl FilterSelection {
    /// Every year and every state of `table`; `None` when it is empty.
    pub fn full(table: &ClimateTable) -> Option<Self> {
        let (from_year, to_year) = table.year_span()?;
        Some(Self {
            from_year,
            to_year,
            states: table.states().into_iter().collect(),
        })
    }

    pub fn matches(&self, record: &ClimateRecord) -> bool {
        record.year >= self.from_year
            && record.year <= self.to_year
            && self.states.contains(&record.state)
    }

    /// Records passing the selection, in their original order.
    pub fn apply(&self, table: &ClimateTable) -> ClimateTable {
        table
            .records()
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}
