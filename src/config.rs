//! Dashboard configuration, loaded from an optional JSON file.
//!
//! ```json
//! {
//!   "layout": "auto",
//!   "coercion": { "comma": "auto", "legacy_strip_hyphens": false },
//!   "bounds": { "max_temp_ceiling": 45.0 },
//!   "export": { "image_width": 1200 }
//! }
//! ```
//! Missing keys fall back to their defaults.

use crate::data::{Bounds, CoercionRules, LayoutMode};
use crate::error::{DashboardError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sizes and names used by the PNG and CSV exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub image_width: u32,
    pub image_height: u32,
    pub csv_file_name: String,
    pub report_file_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            image_width: 1200,
            image_height: 700,
            csv_file_name: "malaysia_climate_filtered.csv".to_string(),
            report_file_name: "climate_report.md".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub layout: LayoutMode,
    pub coercion: CoercionRules,
    pub bounds: Bounds,
    pub export: ExportSettings,
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DashboardError::io(path, e))?;
        let config = Self::from_json(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Stable text identifying everything that changes the cleaner's output.
    pub fn cleaning_fingerprint(&self) -> Result<String> {
        Ok(serde_json::to_string(&(&self.layout, &self.coercion, &self.bounds))?)
    }
}
