//! Malaysia Climate Dashboard - CSV cleaning & interactive climate charts
//!
//! Without a subcommand the dashboard window opens; `clean` and `export` run
//! the same pipeline headless.

use anyhow::anyhow;
use clap::Parser;
use climate_dashboard::cli::{init_logging, load_config, run, Cli};
use climate_dashboard::dashboard::Dashboard;
use climate_dashboard::gui::ClimateApp;
use eframe::egui;
use log::error;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(&cli)?;

    if let Some(command) = cli.command {
        return run(command, config);
    }

    let mut dashboard = Dashboard::new(config);
    if let Some(path) = &cli.data {
        // A bad preload still opens the window so another file can be picked.
        if let Err(e) = dashboard.load_path(path) {
            error!("Could not load {}: {}", path.display(), e);
        }
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Malaysia Climate Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Malaysia Climate Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(ClimateApp::new(cc, dashboard)))),
    )
    .map_err(|e| anyhow!("GUI error: {e}"))
}
