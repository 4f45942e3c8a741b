use chrono::NaiveDate;

use crate::data::filter::View;
use crate::data::model::Column;

use super::correlation::paired_values;

/// `(date, value)` points for rows that have both, sorted by date.
/// Rows sharing a date keep their view order.
pub fn time_series(view: &View<'_>, column: Column) -> Vec<(NaiveDate, f64)> {
    let mut points: Vec<(NaiveDate, f64)> = view
        .records()
        .filter_map(|r| Some((r.date?, r.value(column)?)))
        .collect();
    points.sort_by_key(|&(date, _)| date);
    points
}

/// `(x, y)` points over rows where both columns are present.
pub fn scatter(view: &View<'_>, x: Column, y: Column) -> Vec<(f64, f64)> {
    paired_values(view, x, y)
}
