use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::export::export_csv;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export CSV…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(
            RichText::new(state.series.source.display().to_string()).monospace(),
        );
        if let Some(summary) = &state.summary {
            ui.label(summary.to_string());
        }

        ui.separator();

        if ui
            .selectable_label(state.show_markers, "Markers")
            .clicked()
        {
            state.show_markers = !state.show_markers;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Open stress-test log")
        .add_filter("Log files", &["txt", "log"]);
    if let Some(dir) = state.series.source.parent() {
        dialog = dialog.set_directory(dir);
    }

    if let Some(path) = dialog.pick_file() {
        state.load_path(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export samples")
        .add_filter("CSV", &["csv"])
        .set_file_name("samples.csv")
        .save_file();

    if let Some(path) = file {
        match export_csv(&state.series, &path) {
            Ok(()) => {
                log::info!("Exported {} samples to {}", state.series.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                let e = anyhow::Error::new(e);
                log::error!("Failed to export CSV: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
