use eframe::egui::{Color32, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoints, Points};

use crate::state::AppState;

pub const PLOT_TITLE: &str = "FPS vs Spawned Object Count";
const LINE_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

// ---------------------------------------------------------------------------
// FPS plot (central panel)
// ---------------------------------------------------------------------------

/// Render FPS against spawned object count.
pub fn fps_plot(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(PLOT_TITLE);
    });

    let points = state.series.points();

    Plot::new("fps_plot")
        .x_axis_label("Spawned Object Count")
        .y_axis_label("FPS")
        .show_grid(true)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let line = Line::new(PlotPoints::from(points.clone()))
                .name("FPS")
                .color(LINE_COLOR)
                .width(1.5);
            plot_ui.line(line);

            if state.show_markers {
                let markers = Points::new(PlotPoints::from(points))
                    .shape(MarkerShape::Circle)
                    .radius(3.0)
                    .filled(true)
                    .color(LINE_COLOR);
                plot_ui.points(markers);
            }
        });
}
