use crate::data::filter::View;
use crate::data::model::Column;

/// Scalar summary of one column over a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryMetrics {
    /// Sum of present values; 0 when there are none.
    pub total: f64,
    /// `None` when no value is present.
    pub mean: Option<f64>,
    /// `None` when no value is present.
    pub max: Option<f64>,
    /// Number of present values.
    pub count: usize,
}

/// Summarize `column` over `view`, skipping missing values.
pub fn summarize(view: &View<'_>, column: Column) -> SummaryMetrics {
    summarize_values(view.records().filter_map(|r| r.value(column)))
}

fn summarize_values(values: impl Iterator<Item = f64>) -> SummaryMetrics {
    let mut total = 0.0;
    let mut max: Option<f64> = None;
    let mut count = 0usize;

    for v in values {
        total += v;
        count += 1;
        max = Some(max.map_or(v, |m| m.max(v)));
    }

    let mean = (count > 0).then(|| total / count as f64);

    SummaryMetrics {
        total,
        mean,
        max,
        count,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;
    use crate::data::filter::{filter, FilterSpec};
    use crate::data::model::{Dataset, Disease, EnvFactor, Record};

    fn row(y: i32, m: u32, asthma: f64, pm25: Option<f64>) -> Record {
        let mut diseases = BTreeMap::new();
        diseases.insert(Disease::Asthma, asthma);
        let mut env = BTreeMap::new();
        if let Some(v) = pm25 {
            env.insert(EnvFactor::Pm25Avg, v);
        }
        Record::new("", NaiveDate::from_ymd_opt(y, m, 1), diseases, env)
    }

    fn two_rows() -> Dataset {
        Dataset::from_records(vec![
            row(2023, 1, 10.0, Some(50.0)),
            row(2023, 2, 20.0, Some(80.0)),
        ])
    }

    #[test]
    fn summarizes_full_view() {
        let ds = two_rows();
        let view = filter(&ds, &FilterSpec::default());
        let s = summarize(&view, Column::Disease(Disease::Asthma));
        assert_eq!(
            s,
            SummaryMetrics {
                total: 30.0,
                mean: Some(15.0),
                max: Some(20.0),
                count: 2,
            }
        );
    }

    #[test]
    fn empty_view_reports_no_data() {
        let ds = two_rows();
        let view = filter(&ds, &FilterSpec::new(Some(2024), None));
        let s = summarize(&view, Column::Disease(Disease::Asthma));
        assert_eq!(s.count, 0);
        assert_eq!(s.total, 0.0);
        assert_eq!(s.mean, None);
        assert_eq!(s.max, None);
    }

    #[test]
    fn missing_values_are_excluded_not_zeroed() {
        let ds = Dataset::from_records(vec![
            row(2023, 1, 1.0, Some(30.0)),
            row(2023, 2, 1.0, None),
            row(2023, 3, 1.0, Some(60.0)),
        ]);
        let view = filter(&ds, &FilterSpec::default());
        let s = summarize(&view, Column::Env(EnvFactor::Pm25Avg));
        assert_eq!(s.count, 2);
        assert_eq!(s.total, 90.0);
        assert_eq!(s.mean, Some(45.0));
        assert_eq!(s.max, Some(60.0));
    }

    #[test]
    fn all_missing_column_is_no_data() {
        let ds = Dataset::from_records(vec![row(2023, 1, 1.0, None), row(2023, 2, 2.0, None)]);
        let view = filter(&ds, &FilterSpec::default());
        let s = summarize(&view, Column::Env(EnvFactor::Pm25Avg));
        assert_eq!(s.count, 0);
        assert_eq!(s.mean, None);
        assert_eq!(s.max, None);
    }

    #[test]
    fn max_handles_negative_values() {
        let s = summarize_values([-5.0, -2.0, -9.0].into_iter());
        assert_eq!(s.max, Some(-2.0));
    }

    proptest! {
        #[test]
        fn count_never_exceeds_view_length(
            rows in prop::collection::vec((0.0f64..100.0, prop::option::of(0.0f64..300.0)), 0..30)
        ) {
            let ds = Dataset::from_records(
                rows.iter().map(|&(a, p)| row(2023, 1, a, p)).collect(),
            );
            let view = filter(&ds, &FilterSpec::default());
            let s = summarize(&view, Column::Env(EnvFactor::Pm25Avg));
            prop_assert!(s.count <= view.len());
            if s.count == 0 {
                prop_assert!(s.mean.is_none() && s.max.is_none());
            } else {
                let mean = s.mean.unwrap();
                prop_assert!(mean <= s.max.unwrap() + 1e-9);
            }
        }
    }
}
