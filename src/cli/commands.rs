use crate::charts::StaticChartRenderer;
use crate::cli::args::{Cli, Commands};
use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use anyhow::Context;
use log::{info, warn};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// `--verbose` raises the default filter to debug; `RUST_LOG` still wins.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

/// Configuration file (or defaults) with the command-line overrides applied.
pub fn load_config(cli: &Cli) -> anyhow::Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    if let Some(layout) = cli.layout {
        config.layout = layout.into();
    }
    Ok(config)
}

pub fn run(command: Commands, config: DashboardConfig) -> anyhow::Result<()> {
    match command {
        Commands::Clean { input, output } => clean(&input, &output, config),
        Commands::Export {
            input,
            output_dir,
            from_year,
            to_year,
            states,
        } => export(&input, &output_dir, from_year, to_year, states, config),
    }
}

fn clean(input: &Path, output: &Path, config: DashboardConfig) -> anyhow::Result<()> {
    println!("Cleaning {}", input.display());

    let mut dashboard = Dashboard::new(config);
    let dataset = dashboard.load_path(input)?;
    println!("{}", dataset.report.summary());

    create_parent(output)?;
    dashboard.export_csv(output)?;
    println!("Cleaned table written to {}", output.display());
    Ok(())
}

fn export(
    input: &Path,
    output_dir: &Path,
    from_year: Option<i32>,
    to_year: Option<i32>,
    states: Vec<String>,
    config: DashboardConfig,
) -> anyhow::Result<()> {
    println!("Exporting {}", input.display());

    let mut dashboard = Dashboard::new(config);
    let dataset = dashboard.load_path(input)?;
    println!("{}", dataset.report.summary());
    let available: BTreeSet<String> = dataset.table.states().into_iter().collect();

    if let Some(mut selection) = dashboard.selection().cloned() {
        if let Some(year) = from_year {
            selection.from_year = year;
        }
        if let Some(year) = to_year {
            selection.to_year = year;
        }
        if !states.is_empty() {
            for state in states.iter().filter(|s| !available.contains(*s)) {
                warn!("State '{}' does not occur in {}", state, input.display());
            }
            selection.states = states.into_iter().collect();
        }
        dashboard.set_selection(selection);
    }

    let export = dashboard.config().export.clone();
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let csv_path = output_dir.join(&export.csv_file_name);
    dashboard.export_csv(&csv_path)?;
    let rows = dashboard.view().map_or(0, |v| v.filtered.len());
    println!("Wrote {} records to {}", rows, csv_path.display());

    // Report and charts need at least one record.
    let report = dashboard.report()?;
    let report_path = output_dir.join(&export.report_file_name);
    std::fs::write(&report_path, report)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;
    println!("Report written to {}", report_path.display());

    if let Some(view) = dashboard.view() {
        let renderer = StaticChartRenderer::new(export.image_width, export.image_height);
        let charts: Vec<PathBuf> = renderer.export_all(view, output_dir)?;
        println!("Rendered {} charts", charts.len());
    }

    info!("Export complete: {}", output_dir.display());
    Ok(())
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}
