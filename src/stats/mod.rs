//! Statistics over a filtered [`View`](crate::data::filter::View):
//! summary metrics, Pearson correlation, OLS trendlines and chart series.

pub mod correlation;
pub mod metrics;
pub mod series;

use std::fmt;

use crate::data::model::Column;

/// Why a statistic could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsufficientData {
    /// The view has fewer rows than the statistic needs.
    TooFewRows { rows: usize },
    /// Fewer than two rows have both columns present.
    TooFewPairs { pairs: usize },
    /// The column is constant over the eligible rows.
    ZeroVariance { column: Column },
    /// Values are too large for the sums of squares to stay finite.
    Overflow,
}

impl fmt::Display for InsufficientData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsufficientData::TooFewRows { rows } => {
                write!(f, "needs at least 2 rows, found {rows}")
            }
            InsufficientData::TooFewPairs { pairs } => {
                write!(f, "needs at least 2 paired observations, found {pairs}")
            }
            InsufficientData::ZeroVariance { column } => {
                write!(f, "{column} does not vary in the selected rows")
            }
            InsufficientData::Overflow => {
                write!(f, "values are too large to compute")
            }
        }
    }
}

/// Result of a statistic that may legitimately have no value.
///
/// This is not an error: callers render `Unavailable` as an informational
/// "no data" state.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate<T> {
    Available(T),
    Unavailable(InsufficientData),
}

impl<T> Estimate<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Estimate::Available(_))
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            Estimate::Available(v) => Some(v),
            Estimate::Unavailable(_) => None,
        }
    }
}
