use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::model::{Dataset, Disease, EnvFactor, Record, RowParseWarning};

/// Header of the date column.
pub const DATE_COLUMN: &str = "Date";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a data file could not be turned into a [`Dataset`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("data file is unreadable: {0}")]
    Unreadable(#[from] csv::Error),

    #[error("data file is missing required columns: {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a CSV file on disk.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Unreadable(e.into()),
    })?;
    let dataset = load_reader(file)?;
    log::info!(
        "Loaded {} rows from {} ({} warnings)",
        dataset.len(),
        path.display(),
        dataset.warnings.len()
    );
    Ok(dataset)
}

/// Load a dataset from any CSV source.
///
/// The header row must contain `Date`, the five disease columns and the four
/// environmental factor columns; other columns are ignored. Cells that fail to
/// parse degrade to missing values and are reported in
/// [`Dataset::warnings`] instead of aborting the load.
pub fn load_reader<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let layout = ColumnLayout::resolve(&headers)?;

    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let row_no = i + 1;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let raw_date = cell(layout.date);
        let date = parse_date(raw_date);
        if date.is_none() {
            warnings.push(RowParseWarning {
                row: row_no,
                column: DATE_COLUMN.to_string(),
                value: raw_date.to_string(),
            });
        }

        let mut disease_counts = BTreeMap::new();
        for &(disease, idx) in &layout.diseases {
            match parse_number(cell(idx)) {
                Ok(Some(v)) if v >= 0.0 => {
                    disease_counts.insert(disease, v);
                }
                Ok(None) => {}
                Ok(Some(_)) | Err(()) => warnings.push(RowParseWarning {
                    row: row_no,
                    column: disease.column_name().to_string(),
                    value: cell(idx).to_string(),
                }),
            }
        }

        let mut env_factors = BTreeMap::new();
        for &(factor, idx) in &layout.factors {
            match parse_number(cell(idx)) {
                Ok(Some(v)) => {
                    env_factors.insert(factor, v);
                }
                Ok(None) => {}
                Err(()) => warnings.push(RowParseWarning {
                    row: row_no,
                    column: factor.column_name().to_string(),
                    value: cell(idx).to_string(),
                }),
            }
        }

        records.push(Record::new(raw_date, date, disease_counts, env_factors));
    }

    for w in &warnings {
        log::warn!("{w}");
    }

    Ok(Dataset { records, warnings })
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Positions of the required columns within a header row.
struct ColumnLayout {
    date: usize,
    diseases: Vec<(Disease, usize)>,
    factors: Vec<(EnvFactor, usize)>,
}

impl ColumnLayout {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let position = |name: &str| headers.iter().position(|h| h == name);
        let mut missing = Vec::new();

        let date = position(DATE_COLUMN);
        if date.is_none() {
            missing.push(DATE_COLUMN.to_string());
        }

        let mut diseases = Vec::with_capacity(Disease::ALL.len());
        for d in Disease::ALL {
            match position(d.column_name()) {
                Some(idx) => diseases.push((d, idx)),
                None => missing.push(d.column_name().to_string()),
            }
        }

        let mut factors = Vec::with_capacity(EnvFactor::ALL.len());
        for f in EnvFactor::ALL {
            match position(f.column_name()) {
                Some(idx) => factors.push((f, idx)),
                None => missing.push(f.column_name().to_string()),
            }
        }

        match date {
            Some(date) if missing.is_empty() => Ok(ColumnLayout {
                date,
                diseases,
                factors,
            }),
            _ => Err(LoadError::SchemaMismatch { missing }),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
// `%.f` also matches an absent fractional part.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a date cell. Slashed day/month dates are read month-first; a
/// timestamp with an offset keeps its local calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// `Ok(None)` for a blank or NaN cell, `Err` for text that is not a number.
fn parse_number(s: &str) -> Result<Option<f64>, ()> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::{Column, Month};

    const HEADER: &str = "Date,Asthma,COPD,Ischemic_heart_disease,Eye_inflammation,Skin_inflammation,PM25_avg,Temp_avg,Wind Speed,Humidity";

    fn load(body: &str) -> Result<Dataset, LoadError> {
        load_reader(format!("{HEADER}\n{body}").as_bytes())
    }

    #[test]
    fn loads_rows_in_file_order() {
        let ds = load(
            "2023-02-01,20,1,2,3,4,80,30.5,2.1,70\n\
             2023-01-01,10,1,2,3,4,50,29.0,1.8,65\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.warnings.is_empty());
        assert_eq!(ds.records[0].month, Some(Month::February));
        assert_eq!(ds.records[1].value(Column::Disease(Disease::Asthma)), Some(10.0));
        assert_eq!(ds.records[1].value(Column::Env(EnvFactor::WindSpeed)), Some(1.8));
    }

    #[test]
    fn bad_date_degrades_row_instead_of_failing() {
        let ds = load(
            "not-a-date,5,1,1,1,1,40,30,2,60\n\
             2023-03-05,6,1,1,1,1,41,30,2,60\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].date, None);
        assert_eq!(ds.records[0].year, None);
        assert_eq!(ds.records[0].raw_date, "not-a-date");
        assert_eq!(ds.records[0].value(Column::Disease(Disease::Asthma)), Some(5.0));
        assert_eq!(ds.warnings.len(), 1);
        assert_eq!(ds.warnings[0].row, 1);
        assert_eq!(ds.warnings[0].column, DATE_COLUMN);
    }

    #[test]
    fn blank_and_garbage_cells_become_missing() {
        let ds = load("2023-01-01,,1,1,1,1,abc,NaN,2,-3\n").unwrap();
        let r = &ds.records[0];
        assert_eq!(r.value(Column::Disease(Disease::Asthma)), None);
        assert_eq!(r.value(Column::Env(EnvFactor::Pm25Avg)), None);
        assert_eq!(r.value(Column::Env(EnvFactor::TempAvg)), None);
        // negative readings are legal for environmental factors
        assert_eq!(r.value(Column::Env(EnvFactor::Humidity)), Some(-3.0));
        assert_eq!(ds.warnings.len(), 1);
        assert_eq!(ds.warnings[0].column, "PM25_avg");
    }

    #[test]
    fn negative_disease_count_is_rejected() {
        let ds = load("2023-01-01,-4,1,1,1,1,40,30,2,60\n").unwrap();
        assert_eq!(ds.records[0].value(Column::Disease(Disease::Asthma)), None);
        assert_eq!(ds.warnings.len(), 1);
    }

    #[test]
    fn missing_columns_are_a_schema_mismatch() {
        let err = load_reader("Date,Asthma,PM25_avg\n2023-01-01,1,2\n".as_bytes()).unwrap_err();
        match err {
            LoadError::SchemaMismatch { missing } => {
                assert!(missing.contains(&"COPD".to_string()));
                assert!(missing.contains(&"Wind Speed".to_string()));
                assert!(!missing.contains(&"Asthma".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_is_a_schema_mismatch() {
        let err = load_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::SchemaMismatch { .. }));
    }

    #[test]
    fn ragged_row_is_unreadable() {
        let err = load("2023-01-01,1,2\n").unwrap_err();
        assert!(matches!(err, LoadError::Unreadable(_)));
    }

    #[test]
    fn headers_are_trimmed_and_extra_columns_ignored() {
        let csv = "Region, Date ,Asthma,COPD,Ischemic_heart_disease,Eye_inflammation,Skin_inflammation,PM25_avg,Temp_avg,Wind Speed,Humidity\n\
                   North,2024-05-01,1,2,3,4,5,6,7,8,9\n";
        let ds = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].year, Some(2024));
        assert_eq!(ds.records[0].value(Column::Env(EnvFactor::Humidity)), Some(9.0));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { path: p } if p == path));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "2022-12-31,3,1,1,1,1,20,25,3,55").unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].month, Some(Month::December));
    }

    #[test]
    fn minute_precision_timestamps_keep_their_month() {
        let ds = load("2023-03-05 08:30,6,1,1,1,1,41,30,2,60\n").unwrap();
        assert!(ds.warnings.is_empty());
        assert_eq!(ds.records[0].year, Some(2023));
        assert_eq!(ds.records[0].month, Some(Month::March));
    }

    #[test]
    fn accepts_common_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 4, 9);
        assert_eq!(parse_date("2023-04-09"), expected);
        assert_eq!(parse_date("2023/04/09"), expected);
        assert_eq!(parse_date("04/09/2023"), expected);
        assert_eq!(parse_date("2023-04-09 13:45:00"), expected);
        assert_eq!(parse_date("2023-04-09T13:45:00"), expected);
        assert_eq!(parse_date("2023-04-09 13:45"), expected);
        assert_eq!(parse_date("2023-04-09T13:45"), expected);
        assert_eq!(parse_date("2023-04-09 00:00:00.000"), expected);
        assert_eq!(parse_date("2023-04-09T13:45:00.250"), expected);
        assert_eq!(parse_date("2023-04-09T23:30:00+07:00"), expected);
        assert_eq!(parse_date("2023-04-09T13:45:00Z"), expected);
        assert_eq!(parse_date(" 2023-04-09 "), expected);
        assert_eq!(parse_date("2023-13-40"), None);
        assert_eq!(parse_date(""), None);
    }
}
