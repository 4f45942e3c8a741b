mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod stats;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use app::DashboardApp;
use config::Cli;
use data::handle::DatasetHandle;
use state::{compute_snapshot, AppState};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.report {
        return print_report(&cli);
    }

    let mut state = AppState::new(cli.selection());
    state.open(&cli.data);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Air Quality & Health Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("failed to start the window: {e}"))
}

/// Headless mode: load, compute once, print.
fn print_report(cli: &Cli) -> Result<()> {
    let handle = DatasetHandle::open(&cli.data)
        .with_context(|| format!("loading {}", cli.data.display()))?;
    let dataset = handle.dataset();
    let snapshot = compute_snapshot(&dataset, cli.selection(), 1);
    print!("{}", report::render(&snapshot));
    Ok(())
}
