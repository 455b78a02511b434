use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::errors::DomainError;

/// A single typed cell read from the spreadsheet.
///
/// Only [`CellValue::Text`] counts as a string when classifying records;
/// numbers, booleans and nulls in the `email` column are treated as "not a
/// string" while still counting as present.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// A `#NULL!` error cell: present, but holding no value.
    Null,
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Null => Ok(()),
        }
    }
}

/// One row of the input sheet, keyed by header.
///
/// Blank cells are never stored, so a missing key is the "field not present"
/// case the filters distinguish from a present but non-string value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    pub fn set(&mut self, column: impl Into<String>, value: CellValue) {
        self.fields.insert(column.into(), value);
    }

    /// Builder-style variant of [`Record::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(column, value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn email(&self) -> Option<&CellValue> {
        self.get(EMAIL_COLUMN)
    }

    pub fn country_name(&self) -> Option<&CellValue> {
        self.get(COUNTRY_COLUMN)
    }
}

pub const EMAIL_COLUMN: &str = "email";
pub const COUNTRY_COLUMN: &str = "country_name";

/// Top-level classification selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimaryFilter {
    #[default]
    All,
    Government,
    NonGovernment,
}

impl PrimaryFilter {
    pub const ALL: [PrimaryFilter; 3] = [
        PrimaryFilter::All,
        PrimaryFilter::Government,
        PrimaryFilter::NonGovernment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PrimaryFilter::All => "All",
            PrimaryFilter::Government => "Government",
            PrimaryFilter::NonGovernment => "Non-Government",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            PrimaryFilter::All => PrimaryFilter::Government,
            PrimaryFilter::Government => PrimaryFilter::NonGovernment,
            PrimaryFilter::NonGovernment => PrimaryFilter::All,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            PrimaryFilter::All => PrimaryFilter::NonGovernment,
            PrimaryFilter::Government => PrimaryFilter::All,
            PrimaryFilter::NonGovernment => PrimaryFilter::Government,
        }
    }
}

impl fmt::Display for PrimaryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PrimaryFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimaryFilter::ALL
            .into_iter()
            .find(|filter| filter.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownFilter(s.to_string()))
    }
}

/// Refinement of [`PrimaryFilter::Government`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubFilter {
    #[default]
    All,
    Gsi,
}

impl SubFilter {
    pub const ALL: [SubFilter; 2] = [SubFilter::All, SubFilter::Gsi];

    pub fn label(&self) -> &'static str {
        match self {
            SubFilter::All => "All",
            SubFilter::Gsi => "GSI",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            SubFilter::All => SubFilter::Gsi,
            SubFilter::Gsi => SubFilter::All,
        }
    }
}

impl fmt::Display for SubFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SubFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubFilter::ALL
            .into_iter()
            .find(|filter| filter.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownSubFilter(s.to_string()))
    }
}

/// The two selections driving aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    pub primary: PrimaryFilter,
    pub sub: SubFilter,
}

impl FilterState {
    pub fn new(primary: PrimaryFilter, sub: SubFilter) -> Self {
        Self { primary, sub }
    }

    /// Selects a primary filter. The sub-filter always goes back to `All`.
    pub fn with_primary(self, primary: PrimaryFilter) -> Self {
        Self {
            primary,
            sub: SubFilter::All,
        }
    }

    pub fn with_sub(self, sub: SubFilter) -> Self {
        Self { sub, ..self }
    }

    pub fn sub_filter_visible(&self) -> bool {
        self.primary == PrimaryFilter::Government
    }
}

pub const CHART_LABELS: [&str; 2] = ["National", "International"];
pub const DATASET_LABEL: &str = "Number of Users";

/// Fixed two-colour styling of the chart bars, as `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStyle {
    pub background: [&'static str; 2],
    pub border: [&'static str; 2],
    pub border_width: u16,
    pub bar_thickness: u16,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: ["#0A5678", "#3B9EA0"],
            border: ["#073A50", "#E0E0E0"],
            border_width: 2,
            bar_thickness: 120,
        }
    }
}

/// Derived chart state: always exactly two labelled counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: [&'static str; 2],
    pub dataset_label: &'static str,
    pub counts: [usize; 2],
    pub style: ChartStyle,
}

impl ChartData {
    pub fn new(national: usize, international: usize) -> Self {
        Self {
            labels: CHART_LABELS,
            dataset_label: DATASET_LABEL,
            counts: [national, international],
            style: ChartStyle::default(),
        }
    }

    pub fn national(&self) -> usize {
        self.counts[0]
    }

    pub fn international(&self) -> usize {
        self.counts[1]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
