use eframe::egui::{self, RichText, Ui};

use crate::report::{average_label, format_number, format_optional};
use crate::state::{AppState, Snapshot};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render metric cards, charts, heatmap and raw data for the current snapshot.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let (Some(snapshot), Some(dataset)) = (&state.snapshot, state.dataset()) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data file to start  (File → Open…)");
        });
        return;
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(format!("Overview: {}", snapshot.selection.disease));
            ui.label(RichText::new(snapshot.selection.filter.caption()).weak());
            ui.add_space(6.0);

            metric_cards(ui, snapshot);
            ui.separator();

            ui.columns(2, |cols| {
                cols[0].strong("Case trend");
                plot::trend_plot(&mut cols[0], snapshot);

                cols[1].strong(format!(
                    "Relationship with {}",
                    snapshot.selection.env_factor
                ));
                plot::scatter_plot(&mut cols[1], snapshot);
            });

            ui.separator();
            ui.strong("Correlation matrix");
            plot::correlation_heatmap(ui, snapshot);

            ui.separator();
            egui::CollapsingHeader::new(format!("Raw data ({} rows)", snapshot.rows()))
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    table::raw_table(ui, &dataset, &snapshot.indices);
                });
        });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

fn metric_cards(ui: &mut Ui, snapshot: &Snapshot) {
    let env = snapshot.selection.env_factor;
    ui.columns(4, |cols| {
        metric_card(
            &mut cols[0],
            "Total cases",
            &format_number(snapshot.disease.total, 0),
        );
        metric_card(
            &mut cols[1],
            average_label(snapshot),
            &format_optional(snapshot.disease.mean, 0),
        );
        metric_card(
            &mut cols[2],
            &format!("Mean {env}"),
            &format_optional(snapshot.env.mean, 2),
        );
        metric_card(
            &mut cols[3],
            &format!("Max {env}"),
            &format_optional(snapshot.env.max, 2),
        );
    });
}

fn metric_card(ui: &mut Ui, label: &str, value: &str) {
    ui.group(|ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value).size(22.0).strong());
    });
}
