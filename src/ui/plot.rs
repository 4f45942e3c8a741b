use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Align2, FontId, RichText, Sense, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color::{correlation_color, text_color_on, FIT_LINE, SCATTER_POINTS, TREND_LINE};
use crate::report::format_optional;
use crate::state::Snapshot;
use crate::stats::Estimate;

const PLOT_HEIGHT: f32 = 300.0;

fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_date_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Disease trend over time
// ---------------------------------------------------------------------------

/// Line chart of the selected disease against date.
pub fn trend_plot(ui: &mut Ui, snapshot: &Snapshot) {
    if snapshot.trend.is_empty() {
        ui.colored_label(
            egui::Color32::from_rgb(230, 160, 40),
            "No data in the selected period.",
        );
        return;
    }

    let points: Vec<[f64; 2]> = snapshot
        .trend
        .iter()
        .map(|&(date, v)| [date_to_x(date), v])
        .collect();
    let name = snapshot.selection.disease.column_name();

    Plot::new("trend_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label(name)
        .x_axis_formatter(|mark, _range| x_to_date_label(mark.value))
        .label_formatter(|_name, value| {
            format!("{}\n{:.0}", x_to_date_label(value.x), value.y)
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name(name)
                    .color(TREND_LINE)
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(TREND_LINE)
                    .radius(2.5),
            );
        });
}

// ---------------------------------------------------------------------------
// Environmental factor vs disease
// ---------------------------------------------------------------------------

/// Scatter of the environmental factor against the disease, with its OLS line.
pub fn scatter_plot(ui: &mut Ui, snapshot: &Snapshot) {
    if snapshot.scatter.is_empty() {
        ui.colored_label(
            egui::Color32::from_rgb(230, 160, 40),
            "Not enough data to plot.",
        );
        return;
    }

    let sel = &snapshot.selection;
    let points: Vec<[f64; 2]> = snapshot.scatter.iter().map(|&(x, y)| [x, y]).collect();

    let (min_x, max_x) = snapshot
        .scatter
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(x, _)| {
            (lo.min(x), hi.max(x))
        });

    match &snapshot.fit {
        Estimate::Available(fit) => {
            ui.label(format!(
                "y = {:.3}x + {:.3}   R² = {}",
                fit.slope,
                fit.intercept,
                format_optional(fit.r_squared, 3)
            ));
        }
        Estimate::Unavailable(reason) => {
            ui.label(RichText::new(format!("No trendline: {reason}")).italics());
        }
    }

    Plot::new("scatter_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(sel.env_factor.column_name())
        .y_axis_label(sel.disease.column_name())
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .name(format!("{} vs {}", sel.env_factor, sel.disease))
                    .color(SCATTER_POINTS)
                    .radius(3.0),
            );
            if let Some(fit) = snapshot.fit.available() {
                let line = vec![[min_x, fit.predict(min_x)], [max_x, fit.predict(max_x)]];
                plot_ui.line(
                    Line::new(PlotPoints::from(line))
                        .name("OLS trendline")
                        .color(FIT_LINE)
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

const CELL_SIZE: egui::Vec2 = egui::vec2(64.0, 28.0);

/// Grid of coloured cells, one per column pair.
pub fn correlation_heatmap(ui: &mut Ui, snapshot: &Snapshot) {
    let matrix = match &snapshot.matrix {
        Estimate::Available(m) => m,
        Estimate::Unavailable(reason) => {
            ui.label(format!(
                "Select a period with more than one row to show the heatmap ({reason})."
            ));
            return;
        }
    };
    let columns = matrix.columns();

    egui::ScrollArea::horizontal()
        .id_salt("heatmap_scroll")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("correlation_heatmap")
                .spacing([2.0, 2.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for c in columns {
                        ui.label(RichText::new(c.name()).small());
                    }
                    ui.end_row();

                    for (i, row_col) in columns.iter().enumerate() {
                        ui.label(row_col.name());
                        for (j, col_col) in columns.iter().enumerate() {
                            let r = matrix.cell(i, j);
                            let fill = correlation_color(r);
                            let (rect, response) = ui.allocate_exact_size(CELL_SIZE, Sense::hover());
                            ui.painter().rect_filled(rect, 2.0, fill);
                            let text = r.map_or_else(|| "–".to_string(), |r| format!("{r:.2}"));
                            ui.painter().text(
                                rect.center(),
                                Align2::CENTER_CENTER,
                                text,
                                FontId::proportional(12.0),
                                text_color_on(fill),
                            );
                            let hover = match r {
                                Some(r) => format!("{row_col} × {col_col}: {r:.3}"),
                                None => format!("{row_col} × {col_col}: not computable"),
                            };
                            let _ = response.on_hover_text(hover);
                        }
                        ui.end_row();
                    }
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_axis_round_trips() {
        let d = NaiveDate::from_ymd_opt(2023, 7, 4).unwrap();
        assert_eq!(x_to_date_label(date_to_x(d)), "2023-07-04");
        assert_eq!(x_to_date_label(date_to_x(d) + 0.4), "2023-07-04");
        assert_eq!(x_to_date_label(1e12), "");
    }
}
