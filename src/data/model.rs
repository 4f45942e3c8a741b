use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Returned when a name does not match any known column or month.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{name}'")]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}

/// Health outcome columns, in the order they appear in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Disease {
    Asthma,
    Copd,
    IschemicHeartDisease,
    EyeInflammation,
    SkinInflammation,
}

impl Disease {
    pub const ALL: [Disease; 5] = [
        Disease::Asthma,
        Disease::Copd,
        Disease::IschemicHeartDisease,
        Disease::EyeInflammation,
        Disease::SkinInflammation,
    ];

    /// Header name in the input file.
    pub fn column_name(self) -> &'static str {
        match self {
            Disease::Asthma => "Asthma",
            Disease::Copd => "COPD",
            Disease::IschemicHeartDisease => "Ischemic_heart_disease",
            Disease::EyeInflammation => "Eye_inflammation",
            Disease::SkinInflammation => "Skin_inflammation",
        }
    }
}

/// Environmental measurement columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnvFactor {
    Pm25Avg,
    TempAvg,
    WindSpeed,
    Humidity,
}

impl EnvFactor {
    pub const ALL: [EnvFactor; 4] = [
        EnvFactor::Pm25Avg,
        EnvFactor::TempAvg,
        EnvFactor::WindSpeed,
        EnvFactor::Humidity,
    ];

    /// Header name in the input file.
    pub fn column_name(self) -> &'static str {
        match self {
            EnvFactor::Pm25Avg => "PM25_avg",
            EnvFactor::TempAvg => "Temp_avg",
            EnvFactor::WindSpeed => "Wind Speed",
            EnvFactor::Humidity => "Humidity",
        }
    }
}

/// Any numeric column of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Disease(Disease),
    Env(EnvFactor),
}

impl Column {
    /// All numeric columns: diseases first, then environmental factors.
    pub fn all() -> Vec<Column> {
        Disease::ALL
            .iter()
            .map(|&d| Column::Disease(d))
            .chain(EnvFactor::ALL.iter().map(|&e| Column::Env(e)))
            .collect()
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Disease(d) => d.column_name(),
            Column::Env(e) => e.column_name(),
        }
    }
}

/// Case-insensitive match that also treats `_` and ` ` as equal, so
/// `wind_speed` finds `Wind Speed` on the command line.
fn names_match(candidate: &str, canonical: &str) -> bool {
    let norm = |s: &str| s.trim().to_ascii_lowercase().replace(' ', "_");
    norm(candidate) == norm(canonical)
}

impl FromStr for Disease {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Disease::ALL
            .into_iter()
            .find(|d| names_match(s, d.column_name()))
            .ok_or_else(|| UnknownName {
                kind: "disease",
                name: s.to_string(),
            })
    }
}

impl FromStr for EnvFactor {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnvFactor::ALL
            .into_iter()
            .find(|e| names_match(s, e.column_name()))
            .ok_or_else(|| UnknownName {
                kind: "environmental factor",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl fmt::Display for EnvFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Month – derived calendar field
// ---------------------------------------------------------------------------

/// Calendar month; `Ord` follows calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month from its 1-based number.
    pub fn from_number(n: u32) -> Option<Month> {
        Month::ALL.get(n.checked_sub(1)? as usize).copied()
    }

    pub fn of(date: NaiveDate) -> Month {
        // `month0()` is always 0..=11
        Month::ALL[date.month0() as usize]
    }

    /// Full English name.
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl FromStr for Month {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u32>() {
            if let Some(m) = Month::from_number(n) {
                return Ok(m);
            }
        }
        Month::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s) || m.name()[..3].eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownName {
                kind: "month",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the input file
// ---------------------------------------------------------------------------

/// A single parsed row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Date cell exactly as it appeared in the file.
    pub raw_date: String,
    /// Parsed date, `None` when the cell could not be parsed.
    pub date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<Month>,
    /// Present disease counts; a missing cell has no entry.
    pub disease_counts: BTreeMap<Disease, f64>,
    /// Present measurements; a missing cell has no entry.
    pub env_factors: BTreeMap<EnvFactor, f64>,
}

impl Record {
    /// Build a record and derive its calendar fields from `date`.
    pub fn new(
        raw_date: impl Into<String>,
        date: Option<NaiveDate>,
        disease_counts: BTreeMap<Disease, f64>,
        env_factors: BTreeMap<EnvFactor, f64>,
    ) -> Self {
        Record {
            raw_date: raw_date.into(),
            date,
            year: date.map(|d| d.year()),
            month: date.map(Month::of),
            disease_counts,
            env_factors,
        }
    }

    /// Value of a numeric column, `None` if missing.
    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Disease(d) => self.disease_counts.get(&d).copied(),
            Column::Env(e) => self.env_factors.get(&e).copied(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded file
// ---------------------------------------------------------------------------

/// A row that loaded with degraded fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowParseWarning {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub column: String,
    pub value: String,
}

impl fmt::Display for RowParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: could not parse {} value '{}'",
            self.row, self.column, self.value
        )
    }
}

/// The full parsed dataset, in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Non-fatal problems found while loading.
    pub warnings: Vec<RowParseWarning>,
}

impl Dataset {
    #[cfg(test)]
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset {
            records,
            warnings: Vec::new(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present, newest first.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.records.iter().filter_map(|r| r.year).collect();
        years.into_iter().rev().collect()
    }

    /// Number of rows whose date did not parse.
    pub fn undated_rows(&self) -> usize {
        self.records.iter().filter(|r| r.date.is_none()).count()
    }
}
