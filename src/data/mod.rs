//! Data module - CSV loading, cleaning, filtering and export

mod cache;
mod cleaner;
mod coercion;
mod export;
mod filter;
mod loader;
pub(crate) mod record;

pub use cache::{CleanCache, CleanedDataset};
pub use cleaner::{Bounds, ClimateCleaner, CleaningReport, LayoutMode};
pub use coercion::{CoercionRules, CommaPolicy};
pub use export::CsvExporter;
pub use filter::FilterSelection;
pub use loader::{content_digest, DataLoader, RawTable, Upload};
pub use record::{ClimateRecord, ClimateTable, Metric, AVG_TEMP_COLUMN, CANONICAL_COLUMNS};
