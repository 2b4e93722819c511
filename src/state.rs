use std::path::Path;

use crate::data::loader::parse_log;
use crate::data::model::{SeriesSummary, StressSeries};

pub const NO_DATA_MESSAGE: &str = "No data found in log.";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Series currently on screen. Never empty.
    pub series: StressSeries,

    /// Cached summary of `series`.
    pub summary: Option<SeriesSummary>,

    /// Draw a circle at every sample in addition to the line.
    pub show_markers: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(series: StressSeries) -> Self {
        let summary = series.summary();
        Self {
            series,
            summary,
            show_markers: true,
            status_message: None,
        }
    }

    /// Replace the series unless the new one is empty.
    pub fn set_series(&mut self, series: StressSeries) {
        if series.is_empty() {
            log::warn!("{}: {NO_DATA_MESSAGE}", series.source.display());
            self.status_message = Some(NO_DATA_MESSAGE.to_string());
            return;
        }
        self.summary = series.summary();
        self.series = series;
        self.status_message = None;
    }

    /// Parse `path` and swap it in. Failures keep the current series.
    pub fn load_path(&mut self, path: &Path) {
        match parse_log(path) {
            Ok(series) => {
                log::info!("Loaded {} samples from {}", series.len(), path.display());
                self.set_series(series);
            }
            Err(e) => {
                let e = anyhow::Error::new(e);
                log::error!("Failed to load log: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Re-parse the file the current series came from.
    pub fn reload(&mut self) {
        let path = self.series.source.clone();
        self.load_path(&path);
    }
}
