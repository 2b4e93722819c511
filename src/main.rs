mod app;
mod data;
mod state;
mod ui;

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use app::StressPlotApp;
use data::model::StressSeries;
use eframe::egui;
use state::NO_DATA_MESSAGE;

const LOG_PATH_ENV: &str = "STRESS_PLOT_LOG";
const DEFAULT_LOG: &str = "../logs/log20250602.txt";

fn main() -> Result<()> {
    env_logger::init();

    let log_path = resolve_log_path(
        std::env::args_os().nth(1),
        std::env::var_os(LOG_PATH_ENV),
        std::env::current_exe().ok().as_deref(),
    );
    log::info!("Reading stress log {}", log_path.display());

    let series = match data::loader::parse_log(&log_path) {
        Ok(series) => series,
        Err(e) if e.io_kind() == Some(std::io::ErrorKind::NotFound) => {
            return Err(e).with_context(|| {
                format!("log file not found; pass a path or set {LOG_PATH_ENV}")
            });
        }
        Err(e) => return Err(e).with_context(|| format!("parsing {}", log_path.display())),
    };

    present(series, &mut std::io::stdout(), show_window)
}

/// CLI argument, then environment, then the default next to the executable.
fn resolve_log_path(
    arg: Option<OsString>,
    env: Option<OsString>,
    exe: Option<&Path>,
) -> PathBuf {
    if let Some(p) = arg.or(env).filter(|p| !p.is_empty()) {
        return PathBuf::from(p);
    }
    exe.and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_LOG)
}

/// Hand a non-empty series to `render`; otherwise print the no-data notice.
fn present<W, F>(series: StressSeries, out: &mut W, render: F) -> Result<()>
where
    W: Write,
    F: FnOnce(StressSeries) -> Result<()>,
{
    if series.is_empty() {
        log::warn!("{}: no matching lines", series.source.display());
        writeln!(out, "{NO_DATA_MESSAGE}")?;
        return Ok(());
    }
    render(series)
}

/// Open the viewer and block until it is closed.
fn show_window(series: StressSeries) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 500.0])
            .with_min_inner_size([600.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        ui::plot::PLOT_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(StressPlotApp::new(series)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
