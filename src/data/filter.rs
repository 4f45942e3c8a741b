use std::fmt;

use super::model::{Dataset, Month, Record};

// ---------------------------------------------------------------------------
// Filter predicate: which year / month is selected
// ---------------------------------------------------------------------------

/// User selection of calendar filters. `None` means "all" (no predicate).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub year: Option<i32>,
    pub month: Option<Month>,
}

impl FilterSpec {
    pub fn new(year: Option<i32>, month: Option<Month>) -> Self {
        Self { year, month }
    }

    /// A record passes when every active predicate holds. Records without a
    /// date never pass an active predicate.
    pub fn matches(&self, record: &Record) -> bool {
        let year_ok = match self.year {
            None => true,
            Some(y) => record.year == Some(y),
        };
        let month_ok = match self.month {
            None => true,
            Some(m) => record.month == Some(m),
        };
        year_ok && month_ok
    }

    /// Both a year and a month are selected, so the view spans a single
    /// calendar month and averages are per day rather than per month.
    pub fn is_single_month(&self) -> bool {
        self.year.is_some() && self.month.is_some()
    }

    /// Short human-readable description of the active filters.
    pub fn caption(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(y) => write!(f, "Year: {y}")?,
            None => write!(f, "Year: All")?,
        }
        match self.month {
            Some(m) => write!(f, " | Month: {m}"),
            None => write!(f, " | Month: All"),
        }
    }
}

// ---------------------------------------------------------------------------
// View: an ordered, read-only subset of a dataset
// ---------------------------------------------------------------------------

/// Records of a [`Dataset`] that passed a filter, in their original order.
#[derive(Debug, Clone)]
pub struct View<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> View<'a> {
    /// Every record of the dataset.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Narrow this view further; never widens it.
    pub fn refine(&self, spec: &FilterSpec) -> View<'a> {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| spec.matches(&self.dataset.records[i]))
            .collect();
        View {
            dataset: self.dataset,
            indices,
        }
    }

    /// Positions of the visible records within the dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Visible records in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }
}

/// Apply `spec` to the whole dataset.
pub fn filter<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> View<'a> {
    View::all(dataset).refine(spec)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::{Column, Disease};

    fn record(ymd: Option<(i32, u32, u32)>, asthma: f64) -> Record {
        let date = ymd.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        let mut diseases = BTreeMap::new();
        diseases.insert(Disease::Asthma, asthma);
        Record::new("", date, diseases, BTreeMap::new())
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record(Some((2023, 2, 1)), 1.0),
            record(Some((2022, 2, 1)), 2.0),
            record(None, 3.0),
            record(Some((2023, 1, 15)), 4.0),
            record(Some((2023, 2, 20)), 5.0),
        ])
    }

    fn asthma(view: &View<'_>) -> Vec<f64> {
        view.records()
            .filter_map(|r| r.value(Column::Disease(Disease::Asthma)))
            .collect()
    }

    #[test]
    fn all_all_is_the_full_dataset_in_order() {
        let ds = sample();
        let view = filter(&ds, &FilterSpec::default());
        assert_eq!(view.indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn year_filter_drops_undated_rows() {
        let ds = sample();
        let view = filter(&ds, &FilterSpec::new(Some(2023), None));
        assert_eq!(asthma(&view), vec![1.0, 4.0, 5.0]);
    }

    #[test]
    fn month_filter_spans_years() {
        let ds = sample();
        let view = filter(&ds, &FilterSpec::new(None, Some(Month::February)));
        assert_eq!(asthma(&view), vec![1.0, 2.0, 5.0]);
    }

    #[test]
    fn predicates_are_conjunctive() {
        let ds = sample();
        let view = filter(&ds, &FilterSpec::new(Some(2023), Some(Month::February)));
        assert_eq!(view.indices(), &[0, 4]);
    }

    #[test]
    fn no_match_is_an_empty_view() {
        let ds = sample();
        let view = filter(&ds, &FilterSpec::new(Some(2030), None));
        assert!(view.is_empty());
        assert_eq!(view.records().count(), 0);
    }

    #[test]
    fn caption_and_single_month() {
        let spec = FilterSpec::new(Some(2023), Some(Month::May));
        assert_eq!(spec.caption(), "Year: 2023 | Month: May");
        assert!(spec.is_single_month());
        assert_eq!(FilterSpec::default().caption(), "Year: All | Month: All");
        assert!(!FilterSpec::new(None, Some(Month::May)).is_single_month());
    }

    fn dataset_strategy() -> impl Strategy<Value = Dataset> {
        prop::collection::vec(
            (
                prop::option::weighted(0.9, (2020i32..2024, 1u32..=12, 1u32..=28)),
                0.0f64..500.0,
            ),
            0..40,
        )
        .prop_map(|rows| {
            Dataset::from_records(rows.into_iter().map(|(ymd, v)| record(ymd, v)).collect())
        })
    }

    fn spec_strategy() -> impl Strategy<Value = FilterSpec> {
        (
            prop::option::of(2019i32..2025),
            prop::option::of(1u32..=12),
        )
            .prop_map(|(year, month)| {
                FilterSpec::new(year, month.and_then(Month::from_number))
            })
    }

    proptest! {
        #[test]
        fn filter_is_an_ordered_subset(ds in dataset_strategy(), spec in spec_strategy()) {
            let view = filter(&ds, &spec);
            prop_assert!(view.len() <= ds.len());
            prop_assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
            for r in view.records() {
                prop_assert!(spec.matches(r));
            }
        }

        #[test]
        fn filter_is_idempotent(ds in dataset_strategy(), spec in spec_strategy()) {
            let once = filter(&ds, &spec);
            let twice = once.refine(&spec);
            prop_assert_eq!(once.indices(), twice.indices());
        }

        #[test]
        fn rejected_rows_fail_the_predicate(ds in dataset_strategy(), spec in spec_strategy()) {
            let view = filter(&ds, &spec);
            let kept: std::collections::BTreeSet<usize> = view.indices().iter().copied().collect();
            for (i, r) in ds.records.iter().enumerate() {
                prop_assert_eq!(kept.contains(&i), spec.matches(r));
            }
        }
    }
}
