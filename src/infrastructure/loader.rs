//! Spreadsheet loading: fetching bytes from a file or URL and turning the
//! first worksheet into [`Record`]s keyed by the header row.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use calamine::{open_workbook_auto_from_rs, CellErrorType, Data, Reader};
use tracing::{debug, info};

use crate::domain::{CellValue, Record};

const EMPTY_HEADER: &str = "__EMPTY";

/// Where the spreadsheet comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

/// How the fetched bytes are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// xlsx, xls, xlsb or ods, detected from the content.
    Workbook,
    Csv,
}

impl Source {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(raw.to_string())
        } else {
            Source::Path(PathBuf::from(raw))
        }
    }

    pub fn format(&self) -> SheetFormat {
        let name = match self {
            Source::Path(path) => path.to_string_lossy().to_ascii_lowercase(),
            Source::Url(url) => url
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_ascii_lowercase(),
        };
        if name.ends_with(".csv") {
            SheetFormat::Csv
        } else {
            SheetFormat::Workbook
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{}", url),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook has no worksheets")]
    NoWorksheet,

    #[error("Load task stopped before producing a result")]
    Interrupted,
}

pub struct SpreadsheetLoader;

impl SpreadsheetLoader {
    /// Fetches and parses `source` in one go. Blocks the calling thread.
    pub fn load(source: &Source) -> Result<Vec<Record>, LoadError> {
        let bytes = Self::fetch(source)?;
        debug!(source = %source, bytes = bytes.len(), "fetched spreadsheet");
        let records = Self::parse(&bytes, source.format())?;
        info!(source = %source, records = records.len(), "parsed spreadsheet");
        Ok(records)
    }

    pub fn fetch(source: &Source) -> Result<Vec<u8>, LoadError> {
        match source {
            Source::Path(path) => fs::read(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            Source::Url(url) => {
                let fetch_error = |source| LoadError::Fetch {
                    url: url.clone(),
                    source,
                };
                let response = reqwest::blocking::get(url)
                    .and_then(|response| response.error_for_status())
                    .map_err(fetch_error)?;
                let bytes = response.bytes().map_err(fetch_error)?;
                Ok(bytes.to_vec())
            }
        }
    }

    pub fn parse(bytes: &[u8], format: SheetFormat) -> Result<Vec<Record>, LoadError> {
        match format {
            SheetFormat::Workbook => Self::parse_workbook(bytes),
            SheetFormat::Csv => Self::parse_csv(bytes),
        }
    }

    /// Reads the first worksheet of an xlsx/xls/xlsb/ods document.
    pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<Record>, LoadError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(LoadError::NoWorksheet)??;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(Vec::new());
        };
        let headers = header_keys(header_row.iter().map(|cell| cell.to_string()));

        let records = rows
            .map(|row| {
                build_record(
                    &headers,
                    row.iter().map(workbook_cell),
                )
            })
            .filter(|record| !record.is_empty())
            .collect();
        Ok(records)
    }

    /// Reads CSV with a header row, inferring numbers and booleans per cell.
    pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Record>, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);

        let headers = header_keys(reader.headers()?.iter().map(String::from));

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            let record = build_record(&headers, row.iter().map(csv_cell));
            if !record.is_empty() {
                records.push(record);
            }
        }
        Ok(records)
    }
}

fn build_record<I>(headers: &[String], cells: I) -> Record
where
    I: Iterator<Item = Option<CellValue>>,
{
    let mut record = Record::new();
    for (header, cell) in headers.iter().zip(cells) {
        if let Some(value) = cell {
            record.set(header.clone(), value);
        }
    }
    record
}

/// Turns raw header cells into unique record keys.
///
/// Blank headers become `__EMPTY`; a repeated name gets `_1`, `_2`, ...,
/// skipping any suffixed name already taken by an earlier column.
fn header_keys<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .map(|name| {
            let base = if name.is_empty() {
                EMPTY_HEADER.to_string()
            } else {
                name
            };
            let mut counter = seen.get(&base).copied().unwrap_or(0);
            if counter == 0 {
                seen.insert(base.clone(), 1);
                return base;
            }
            let key = loop {
                let candidate = format!("{}_{}", base, counter);
                counter += 1;
                if !seen.contains_key(&candidate) {
                    break candidate;
                }
            };
            seen.insert(base, counter);
            seen.insert(key.clone(), 1);
            key
        })
        .collect()
}

fn workbook_cell(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        // Only #NULL! survives as a present value; other errors read as blank.
        Data::Error(CellErrorType::Null) => Some(CellValue::Null),
        Data::Error(_) => None,
    }
}

fn csv_cell(field: &str) -> Option<CellValue> {
    if field.is_empty() {
        return None;
    }
    if field.eq_ignore_ascii_case("true") {
        return Some(CellValue::Bool(true));
    }
    if field.eq_ignore_ascii_case("false") {
        return Some(CellValue::Bool(false));
    }
    match field.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Some(CellValue::Number(n)),
        _ => Some(CellValue::Text(field.to_string())),
    }
}
