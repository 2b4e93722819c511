use eframe::egui;

use crate::data::model::StressSeries;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct StressPlotApp {
    pub state: AppState,
}

impl StressPlotApp {
    pub fn new(series: StressSeries) -> Self {
        Self {
            state: AppState::new(series),
        }
    }
}

impl eframe::App for StressPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::fps_plot(ui, &self.state);
        });
    }
}
