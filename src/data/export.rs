//! CSV export of a (filtered) climate table.

use crate::data::record::{ClimateTable, AVG_TEMP_COLUMN, CANONICAL_COLUMNS};
use crate::error::{DashboardError, Result};
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub struct CsvExporter;

impl CsvExporter {
    /// Canonical columns followed by `AvgTemp_C`.
    pub fn to_dataframe(table: &ClimateTable) -> Result<DataFrame> {
        let records = table.records();
        let [state, station, altitude, year, min_temp, max_temp, rainfall, rain_days, humidity] =
            CANONICAL_COLUMNS;

        let df = DataFrame::new(vec![
            Column::new(
                state.into(),
                records.iter().map(|r| r.state.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                station.into(),
                records.iter().map(|r| r.station.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                altitude.into(),
                records.iter().map(|r| r.altitude_m).collect::<Vec<_>>(),
            ),
            Column::new(
                year.into(),
                records.iter().map(|r| r.year).collect::<Vec<_>>(),
            ),
            Column::new(
                min_temp.into(),
                records.iter().map(|r| r.min_temp_c).collect::<Vec<_>>(),
            ),
            Column::new(
                max_temp.into(),
                records.iter().map(|r| r.max_temp_c).collect::<Vec<_>>(),
            ),
            Column::new(
                rainfall.into(),
                records.iter().map(|r| r.rainfall_mm).collect::<Vec<_>>(),
            ),
            Column::new(
                rain_days.into(),
                records.iter().map(|r| r.rain_days).collect::<Vec<_>>(),
            ),
            Column::new(
                humidity.into(),
                records.iter().map(|r| r.humidity_pct).collect::<Vec<_>>(),
            ),
            Column::new(
                AVG_TEMP_COLUMN.into(),
                records.iter().map(|r| r.avg_temp_c).collect::<Vec<_>>(),
            ),
        ])?;

        Ok(df)
    }

    /// UTF-8 CSV with a header row.
    pub fn to_bytes(table: &ClimateTable) -> Result<Vec<u8>> {
        let mut df = Self::to_dataframe(table)?;
        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .finish(&mut df)?;
        Ok(buffer)
    }

    pub fn write(table: &ClimateTable, path: &Path) -> Result<()> {
        let mut df = Self::to_dataframe(table)?;
        let mut file = File::create(path).map_err(|e| DashboardError::io(path, e))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
        info!("Exported {} rows to {}", table.len(), path.display());
        Ok(())
    }
}
