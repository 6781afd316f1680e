use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::Parser;
use eframe::egui;
use serde::Serialize;

use rusty_realty::app::RealtyApp;
use rusty_realty::config::Args;
use rusty_realty::data::dashboard::Dashboard;
use rusty_realty::data::filter::{DataBounds, FilterState};
use rusty_realty::state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.report {
        return print_report(&args);
    }
    if args.export {
        return export_all(&args);
    }
    run_dashboard(args)
}

fn run_dashboard(args: Args) -> Result<()> {
    let font = args
        .font
        .as_ref()
        .map(|path| {
            std::fs::read(path).with_context(|| format!("reading font {}", path.display()))
        })
        .transpose()?;

    let mut state = AppState::new(&args);
    state.load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Realty – Commercial Listings Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(RealtyApp::new(cc, state, font)))),
    )
    .map_err(|e| anyhow!("running the dashboard: {e}"))
}

#[derive(Serialize)]
struct Report<'a> {
    source: String,
    bounds: &'a DataBounds,
    filters: &'a FilterState,
    dashboard: &'a Dashboard,
}

/// Headless: the dashboard for everything in the file, as JSON on stdout.
fn print_report(args: &Args) -> Result<()> {
    let state = loaded_state(args)?;
    let dashboard = state
        .dashboard
        .as_ref()
        .context("no listings to summarise")?;

    let report = Report {
        source: state.data_path.display().to_string(),
        bounds: &state.bounds,
        filters: &state.filters,
        dashboard,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Headless: write the unfiltered export file and print its path.
fn export_all(args: &Args) -> Result<()> {
    let mut state = loaded_state(args)?;
    let path = state
        .export(Local::now().date_naive())
        .context("exporting CSV")?;
    println!("{}", path.display());
    Ok(())
}

fn loaded_state(args: &Args) -> Result<AppState> {
    let mut state = AppState::new(args);
    state.load();
    if let Some(warning) = &state.warning {
        bail!("{warning}");
    }
    Ok(state)
}
