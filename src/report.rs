use std::fmt::{self, Write};

use crate::data::model::Column;
use crate::state::Snapshot;
use crate::stats::correlation::CorrelationMatrix;
use crate::stats::Estimate;

/// Shown wherever a statistic has no value.
pub const NO_DATA: &str = "No data";

/// Format with thousands separators and a fixed number of decimals.
pub fn format_number(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && text.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Format an optional statistic, falling back to [`NO_DATA`].
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| format_number(v, decimals))
}

/// Label for the average-cases metric.
pub fn average_label(snapshot: &Snapshot) -> &'static str {
    if snapshot.selection.filter.is_single_month() {
        "Average daily cases"
    } else {
        "Average monthly cases"
    }
}

/// Plain-text rendering of a snapshot.
pub fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    write_report(&mut out, snapshot).expect("writing to a String cannot fail");
    out
}

fn write_report(out: &mut impl Write, snapshot: &Snapshot) -> fmt::Result {
    let sel = &snapshot.selection;

    writeln!(out, "Overview: {}", sel.disease)?;
    writeln!(out, "{}", sel.filter.caption())?;
    writeln!(out, "Rows: {}", snapshot.rows())?;
    writeln!(out)?;

    writeln!(out, "Total cases: {}", format_number(snapshot.disease.total, 0))?;
    writeln!(
        out,
        "{}: {}",
        average_label(snapshot),
        format_optional(snapshot.disease.mean, 0)
    )?;
    writeln!(out, "Mean {}: {}", sel.env_factor, format_optional(snapshot.env.mean, 2))?;
    writeln!(out, "Max {}: {}", sel.env_factor, format_optional(snapshot.env.max, 2))?;
    writeln!(out)?;

    match &snapshot.fit {
        Estimate::Available(fit) => writeln!(
            out,
            "Trendline {} ~ {}: slope {:.4}, intercept {:.4}, R² {} (n = {})",
            sel.disease,
            sel.env_factor,
            fit.slope,
            fit.intercept,
            format_optional(fit.r_squared, 3),
            fit.observations
        )?,
        Estimate::Unavailable(reason) => writeln!(out, "Trendline unavailable: {reason}")?,
    }
    writeln!(out)?;

    match &snapshot.matrix {
        Estimate::Available(matrix) => write_matrix(out, matrix),
        Estimate::Unavailable(reason) => {
            writeln!(out, "Correlation matrix unavailable: {reason}")
        }
    }
}

fn write_matrix(out: &mut impl Write, matrix: &CorrelationMatrix) -> fmt::Result {
    writeln!(out, "Correlation matrix:")?;
    let columns = matrix.columns();
    let width = columns.iter().map(|c| c.name().len()).max().unwrap_or(0);

    write!(out, "{:width$}", "")?;
    for c in columns {
        write!(out, " {:>8}", abbreviate(*c))?;
    }
    writeln!(out)?;

    for (i, c) in columns.iter().enumerate() {
        write!(out, "{:width$}", c.name())?;
        for j in 0..columns.len() {
            match matrix.cell(i, j) {
                Some(r) => write!(out, " {r:>8.2}")?,
                None => write!(out, " {:>8}", "-")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Header text that fits an 8-character cell.
fn abbreviate(column: Column) -> String {
    column.name().chars().take(8).collect()
}
