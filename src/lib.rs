//! Malaysia Climate Dashboard
//!
//! Cleans DOSM station climate CSVs and presents annual trends, variable
//! correlations and state comparisons, interactively or as exported files.

pub mod charts;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod gui;
pub mod report;
pub mod stats;

pub use error::{DashboardError, Result};
