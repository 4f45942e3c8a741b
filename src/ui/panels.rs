use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::{Disease, EnvFactor, Month};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data options");
    ui.separator();

    if state.handle.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // ---- Year ----
    ui.strong("Year");
    let years = state.years();
    let current_year = state.selection.filter.year;
    let mut year = current_year;
    egui::ComboBox::from_id_salt("year")
        .selected_text(year.map_or_else(|| "All years".to_string(), |y| y.to_string()))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut year, None, "All years");
            for y in years {
                ui.selectable_value(&mut year, Some(y), y.to_string());
            }
        });
    if year != current_year {
        state.set_year(year);
    }

    // ---- Month ----
    ui.add_space(4.0);
    ui.strong("Month");
    let current_month = state.selection.filter.month;
    let mut month = current_month;
    egui::ComboBox::from_id_salt("month")
        .selected_text(month.map_or("All months", Month::name))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut month, None, "All months");
            for m in Month::ALL {
                ui.selectable_value(&mut month, Some(m), m.name());
            }
        });
    if month != current_month {
        state.set_month(month);
    }

    ui.separator();

    // ---- Disease ----
    ui.strong("Disease");
    let mut disease = state.selection.disease;
    egui::ComboBox::from_id_salt("disease")
        .selected_text(disease.column_name())
        .show_ui(ui, |ui: &mut Ui| {
            for d in Disease::ALL {
                ui.selectable_value(&mut disease, d, d.column_name());
            }
        });
    state.set_disease(disease);

    // ---- Environmental factor ----
    ui.add_space(4.0);
    ui.strong("Environmental factor");
    let mut factor = state.selection.env_factor;
    egui::ComboBox::from_id_salt("env_factor")
        .selected_text(factor.column_name())
        .show_ui(ui, |ui: &mut Ui| {
            for f in EnvFactor::ALL {
                ui.selectable_value(&mut factor, f, f.column_name());
            }
        });
    state.set_env_factor(factor);
}

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
            if ui
                .add_enabled(state.handle.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(handle), Some(snap)) = (&state.handle, &state.snapshot) {
            ui.label(format!(
                "{}: {} rows loaded, {} visible",
                handle.path().display(),
                handle.dataset().len(),
                snap.rows()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if state.handle.is_none() {
                Color32::RED
            } else {
                Color32::from_rgb(230, 160, 40)
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open health & environment data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
