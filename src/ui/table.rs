use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{Column, Dataset, Record};

/// Raw rows of the current view, in file order.
pub fn raw_table(ui: &mut Ui, dataset: &Dataset, indices: &[usize]) {
    let columns = Column::all();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .column(TableColumn::auto().at_least(90.0))
        .columns(TableColumn::auto().at_least(50.0), 2)
        .columns(TableColumn::auto().at_least(60.0), columns.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Date");
            });
            header.col(|ui| {
                ui.strong("Year");
            });
            header.col(|ui| {
                ui.strong("Month");
            });
            for c in &columns {
                header.col(|ui| {
                    ui.strong(c.name());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, indices.len(), |mut row| {
                let Some(record) = indices
                    .get(row.index())
                    .and_then(|&i| dataset.records.get(i))
                else {
                    return;
                };
                row.col(|ui| {
                    ui.label(record.raw_date.as_str());
                });
                let (year, month) = calendar_cells(record);
                row.col(|ui| {
                    ui.label(year);
                });
                row.col(|ui| {
                    ui.label(month);
                });
                for &c in &columns {
                    row.col(|ui| {
                        ui.label(record.value(c).map(|v| v.to_string()).unwrap_or_default());
                    });
                }
            });
        });
}

/// Derived year and month, blank for an undated row.
fn calendar_cells(record: &Record) -> (String, String) {
    (
        record.year.map(|y| y.to_string()).unwrap_or_default(),
        record.month.map(|m| m.name().to_string()).unwrap_or_default(),
    )
}
