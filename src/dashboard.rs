//! Dashboard session: the cleaned dataset, the current filter and the
//! figures derived from them.
//!
//! Every upload or filter change recomputes Filter → Aggregator in one pass.

use crate::config::DashboardConfig;
use crate::data::{
    CleanCache, CleanedDataset, ClimateCleaner, ClimateTable, CsvExporter, DataLoader,
    FilterSelection, Upload,
};
use crate::error::{DashboardError, Result};
use crate::report::ReportOutline;
use crate::stats::{Aggregator, CorrelationMatrix, GroupKey, GroupMeans, Summary};
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

/// Everything the presenter needs for one selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub filtered: ClimateTable,
    pub yearly: Vec<GroupMeans>,
    pub by_state: Vec<GroupMeans>,
    pub correlation: CorrelationMatrix,
    pub summary: Summary,
}

impl DashboardView {
    pub fn build(filtered: ClimateTable) -> Self {
        Self {
            yearly: Aggregator::group_means(&filtered, GroupKey::Year),
            by_state: Aggregator::group_means(&filtered, GroupKey::State),
            correlation: CorrelationMatrix::compute(&filtered),
            summary: Aggregator::summary(&filtered),
            filtered,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}

pub struct Dashboard {
    config: DashboardConfig,
    cache: CleanCache,
    /// Cache key of the data currently shown.
    dataset_key: Option<String>,
    dataset: Option<Arc<CleanedDataset>>,
    selection: Option<FilterSelection>,
    view: Option<DashboardView>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: CleanCache::new(),
            dataset_key: None,
            dataset: None,
            selection: None,
            view: None,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Read and clean a CSV from disk.
    pub fn load_path(&mut self, path: &Path) -> Result<&CleanedDataset> {
        let upload = DataLoader::load_csv(path)?;
        self.upload(upload)
    }

    /// Clean an upload (or reuse the cached result) and reset the filter to
    /// the full dataset when the data changed.
    pub fn upload(&mut self, upload: Upload) -> Result<&CleanedDataset> {
        let key = CleanCache::key(&upload.digest, &self.config.cleaning_fingerprint()?);
        let config = &self.config;
        let dataset = self.cache.get_or_clean(&key, || {
            let cleaner = ClimateCleaner::new(&config.coercion, &config.bounds, config.layout);
            let (table, report) = cleaner.clean(&upload.table)?;
            Ok(CleanedDataset {
                source_name: upload.name.clone(),
                table,
                report,
            })
        })?;

        // Same bytes under another file name: show the name just uploaded.
        let dataset = if dataset.source_name == upload.name {
            dataset
        } else {
            debug!("Cached data relabelled as '{}'", upload.name);
            Arc::new(CleanedDataset {
                source_name: upload.name.clone(),
                ..CleanedDataset::clone(&dataset)
            })
        };

        if self.dataset_key.as_deref() == Some(key.as_str()) {
            self.dataset = Some(dataset);
        } else {
            info!(
                "Dataset '{}' ready: {}",
                dataset.source_name,
                dataset.report.summary()
            );
            self.selection = FilterSelection::full(&dataset.table);
            self.dataset = Some(dataset);
            self.dataset_key = Some(key);
            self.refresh();
        }

        self.dataset().ok_or(DashboardError::NoFileProvided)
    }

    pub fn dataset(&self) -> Option<&CleanedDataset> {
        self.dataset.as_deref()
    }

    pub fn selection(&self) -> Option<&FilterSelection> {
        self.selection.as_ref()
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    /// Replace the selection, normalising a reversed year range.
    pub fn set_selection(&mut self, mut selection: FilterSelection) {
        if selection.from_year > selection.to_year {
            std::mem::swap(&mut selection.from_year, &mut selection.to_year);
        }
        if self.selection.as_ref() != Some(&selection) {
            self.selection = Some(selection);
            self.refresh();
        }
    }

    pub fn set_year_range(&mut self, from_year: i32, to_year: i32) {
        if let Some(mut selection) = self.selection.clone() {
            selection.from_year = from_year;
            selection.to_year = to_year;
            self.set_selection(selection);
        }
    }

    pub fn set_state(&mut self, state: &str, selected: bool) {
        if let Some(mut selection) = self.selection.clone() {
            if selected {
                selection.states.insert(state.to_string());
            } else {
                selection.states.remove(state);
            }
            self.set_selection(selection);
        }
    }

    pub fn select_all_states(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        if let Some(mut selection) = self.selection.clone() {
            selection.states = dataset.table.states().into_iter().collect();
            self.set_selection(selection);
        }
    }

    pub fn clear_states(&mut self) {
        if let Some(mut selection) = self.selection.clone() {
            selection.states.clear();
            self.set_selection(selection);
        }
    }

    /// Write the filtered table as CSV.
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let view = self.view.as_ref().ok_or(DashboardError::NoFileProvided)?;
        CsvExporter::write(&view.filtered, path)
    }

    /// Markdown outline for the current selection.
    pub fn report(&self) -> Result<String> {
        let (Some(dataset), Some(view)) = (&self.dataset, &self.view) else {
            return Err(DashboardError::NoFileProvided);
        };
        ReportOutline::render(view, &dataset.source_name)
    }

    pub fn cache_stats(&self) -> (usize, usize) {
        self.cache.stats()
    }

    fn refresh(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.view = None;
            return;
        };

        let filtered = match &self.selection {
            Some(selection) => selection.apply(&dataset.table),
            None => ClimateTable::default(),
        };
        debug!(
            "Selection keeps {} of {} records",
            filtered.len(),
            dataset.table.len()
        );
        self.view = Some(DashboardView::build(filtered));
    }
}
