use chrono::NaiveDate;
use finsift_core::{Amount, Direction, Record, UNCATEGORIZED};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

const DATE_COLUMN: &str = "Date";
const DETAILS_COLUMN: &str = "Details";
const AMOUNT_COLUMN: &str = "Amount";
const DIRECTION_COLUMN: &str = "Debit/Credit";

/// Date formats attempted per value when no single format covers the whole
/// column. Day-first formats come before month-first so ambiguous values
/// like `03/04/2024` resolve day-first.
const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%d %b %Y", "%d-%m-%Y", "%d %B %Y", "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y",
];

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("malformed amount: {0}")]
    MalformedAmount(String),
    #[error("malformed date: {0}")]
    MalformedDate(String),
    #[error("malformed direction: {0}")]
    MalformedDirection(String),
}

struct Columns {
    date: usize,
    details: usize,
    amount: usize,
    direction: usize,
}

impl Columns {
    /// Locates the required columns, tolerating incidental whitespace
    /// around header names. Extra columns are simply ignored.
    fn locate(headers: &csv::StringRecord) -> Result<Columns, ParseError> {
        let find = |name: &str| -> Result<usize, ParseError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
        };
        Ok(Columns {
            date: find(DATE_COLUMN)?,
            details: find(DETAILS_COLUMN)?,
            amount: find(AMOUNT_COLUMN)?,
            direction: find(DIRECTION_COLUMN)?,
        })
    }
}

/// Parses a statement export into canonical records. Any malformed value
/// fails the whole file; no partial dataset is produced. Every record
/// starts out "Uncategorized" — classification is a separate stage.
pub fn parse_csv<R: Read>(data: R) -> Result<Vec<Record>, ParseError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(data);
    let columns = Columns::locate(reader.headers()?)?;

    let mut raw_dates = Vec::new();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        if record.is_empty() || record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let field = |col: usize| record.get(col).unwrap_or_default();

        raw_dates.push(field(columns.date).trim().to_string());
        let details = field(columns.details).to_string();
        let amount = parse_amount(field(columns.amount))?;
        let direction = field(columns.direction)
            .parse::<Direction>()
            .map_err(ParseError::MalformedDirection)?;
        rows.push((details, amount, direction));
    }

    let dates = parse_date_column(&raw_dates)?;

    Ok(rows
        .into_iter()
        .zip(dates)
        .map(|((details, amount, direction), date)| Record {
            date,
            details,
            amount,
            direction,
            category: UNCATEGORIZED.to_string(),
        })
        .collect())
}

pub fn parse_file(path: &Path) -> Result<Vec<Record>, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_csv(file)
}

fn parse_amount(s: &str) -> Result<Amount, ParseError> {
    // Thousands separators only; the sign of a line lives in Debit/Credit.
    let cleaned = s.trim().replace(',', "");
    let decimal = Decimal::from_str(&cleaned)
        .map_err(|_| ParseError::MalformedAmount(s.trim().to_string()))?;
    Ok(Amount::from_decimal(decimal.abs()))
}

/// Statement exports use one date format for the whole file, so inference
/// happens once per column: a format is accepted only if it parses every
/// value. Per-value fallback across [`FALLBACK_DATE_FORMATS`] remains for
/// files that break that assumption.
fn parse_date_column(raw: &[String]) -> Result<Vec<NaiveDate>, ParseError> {
    for format in ["%d/%m/%Y", "%d %b %Y"] {
        let parsed: Result<Vec<NaiveDate>, _> = raw
            .iter()
            .map(|s| NaiveDate::parse_from_str(s, format))
            .collect();
        if let Ok(dates) = parsed {
            return Ok(dates);
        }
    }
    raw.iter().map(|s| parse_date_fallback(s)).collect()
}

fn parse_date_fallback(s: &str) -> Result<NaiveDate, ParseError> {
    for format in FALLBACK_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }
    Err(ParseError::MalformedDate(s.to_string()))
}
