use crate::data::filter::View;
use crate::data::model::Column;

use super::{Estimate, InsufficientData};

// ---------------------------------------------------------------------------
// Pairwise moments
// ---------------------------------------------------------------------------

/// Rows of `view` where both `x` and `y` are present, in view order.
pub fn paired_values(view: &View<'_>, x: Column, y: Column) -> Vec<(f64, f64)> {
    view.records()
        .filter_map(|r| Some((r.value(x)?, r.value(y)?)))
        .collect()
}

/// Centered sums of squares and cross products over paired observations.
#[derive(Debug, Clone, Copy)]
struct Moments {
    n: usize,
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
    x_constant: bool,
    y_constant: bool,
    /// False when a sum overflowed to infinity.
    finite: bool,
}

impl Moments {
    /// `None` for an empty slice.
    fn of(pairs: &[(f64, f64)]) -> Option<Self> {
        let &(x0, y0) = pairs.first()?;
        let n = pairs.len();
        let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
        let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for &(x, y) in pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        // Compare raw values: a constant column can still leave rounding
        // residue in `sxx` after subtracting an inexact mean.
        let x_constant = pairs.iter().all(|p| p.0 == x0) || sxx == 0.0;
        let y_constant = pairs.iter().all(|p| p.1 == y0) || syy == 0.0;

        let finite = [mean_x, mean_y, sxx, syy, sxy].iter().all(|v| v.is_finite());

        Some(Moments {
            n,
            mean_x,
            mean_y,
            sxx,
            syy,
            sxy,
            x_constant,
            y_constant,
            finite,
        })
    }

    fn pearson(&self) -> Option<f64> {
        if self.n < 2 || self.x_constant || self.y_constant || !self.finite {
            return None;
        }
        let r = self.sxy / (self.sxx.sqrt() * self.syy.sqrt());
        Some(r.clamp(-1.0, 1.0))
    }
}

/// Pearson correlation over pairwise-complete rows; `None` when fewer than
/// two pairs exist, either column is constant, or the sums overflow.
pub fn pearson(view: &View<'_>, x: Column, y: Column) -> Option<f64> {
    Moments::of(&paired_values(view, x, y))?.pearson()
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Symmetric matrix of Pearson coefficients over numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    columns: Vec<Column>,
    /// Row-major, `columns.len()²` cells. `None` = not computable.
    cells: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Coefficient for a pair, `None` if not computable or not in the matrix.
    #[cfg(test)]
    pub fn get(&self, a: Column, b: Column) -> Option<f64> {
        let i = self.columns.iter().position(|&c| c == a)?;
        let j = self.columns.iter().position(|&c| c == b)?;
        self.cell(i, j)
    }

    /// Coefficient by row / column position.
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        let n = self.columns.len();
        if row >= n || col >= n {
            return None;
        }
        self.cells[row * n + col]
    }
}

/// Correlation matrix over every numeric column of the view.
pub fn correlation_matrix(view: &View<'_>) -> Estimate<CorrelationMatrix> {
    correlation_matrix_for(view, &Column::all())
}

/// Correlation matrix over the given columns.
///
/// Unavailable when the view has fewer than two rows. Each cell uses only the
/// rows where both of its columns are present.
pub fn correlation_matrix_for(view: &View<'_>, columns: &[Column]) -> Estimate<CorrelationMatrix> {
    if view.len() < 2 {
        return Estimate::Unavailable(InsufficientData::TooFewRows { rows: view.len() });
    }

    let n = columns.len();
    let mut cells = vec![None; n * n];

    for i in 0..n {
        for j in i..n {
            let r = if i == j {
                // a column with spread correlates perfectly with itself
                let values: Vec<(f64, f64)> = view
                    .records()
                    .filter_map(|rec| rec.value(columns[i]).map(|v| (v, v)))
                    .collect();
                Moments::of(&values)
                    .filter(|m| m.n >= 2 && !m.x_constant)
                    .map(|_| 1.0)
            } else {
                pearson(view, columns[i], columns[j])
            };
            cells[i * n + j] = r;
            cells[j * n + i] = r;
        }
    }

    Estimate::Available(CorrelationMatrix {
        columns: columns.to_vec(),
        cells,
    })
}

// ---------------------------------------------------------------------------
// Ordinary least squares
// ---------------------------------------------------------------------------

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trendline {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; `None` when `y` is constant.
    pub r_squared: Option<f64>,
    /// Number of paired observations used.
    pub observations: usize,
}

impl Trendline {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `y` against `x` over rows where both are present.
pub fn trendline(view: &View<'_>, x: Column, y: Column) -> Estimate<Trendline> {
    let pairs = paired_values(view, x, y);
    let m = match Moments::of(&pairs) {
        Some(m) if m.n >= 2 => m,
        _ => {
            return Estimate::Unavailable(InsufficientData::TooFewPairs { pairs: pairs.len() })
        }
    };
    if m.x_constant {
        return Estimate::Unavailable(InsufficientData::ZeroVariance { column: x });
    }
    if !m.finite {
        return Estimate::Unavailable(InsufficientData::Overflow);
    }

    let slope = m.sxy / m.sxx;
    let intercept = m.mean_y - slope * m.mean_x;
    let r_squared = (!m.y_constant).then(|| (m.sxy * m.sxy / (m.sxx * m.syy)).clamp(0.0, 1.0));

    Estimate::Available(Trendline {
        slope,
        intercept,
        r_squared,
        observations: m.n,
    })
}
