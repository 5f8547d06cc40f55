// =============================================================================
// Data Normalizer — raw price table to PriceSeries
// =============================================================================
//
// Input rows carry every field as text, in the layout of a typical historical
// price export:
//
//   Date, Price, Open, High, Low, Change %, Vol.
//
// Normalisation:
//   1. Locate the required columns (Date, Price, Open, High, Low).
//   2. Parse every row; any bad date or number aborts the whole table.
//   3. Stable-sort by date (ties keep their input order).
//
// Prices may carry thousands separators ("1,234.56"), `Change %` carries a
// percent suffix ("3.2%"), and `Vol.` uses magnitude suffixes ("1.23M").
// =============================================================================

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::market_data::price_series::{PriceRecord, PriceSeries};

pub const COL_DATE: &str = "Date";
pub const COL_PRICE: &str = "Price";
pub const COL_OPEN: &str = "Open";
pub const COL_HIGH: &str = "High";
pub const COL_LOW: &str = "Low";
pub const COL_CHANGE: &str = "Change %";
pub const COL_VOLUME: &str = "Vol.";

/// Textual date layouts tried in order.  Slash dates are month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y%m%d",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

// ---------------------------------------------------------------------------
// RawTable -- untyped rows as delivered by the caller
// ---------------------------------------------------------------------------

/// An in-memory table of text cells with a header row.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Read a table from CSV.  The first record is the header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self::new(rdr.headers()?.iter());
        for record in rdr.records() {
            table.push_row(record?.iter());
        }
        Ok(table)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header lookup tolerant of surrounding whitespace and a UTF-8 BOM.
    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| Error::MissingColumn {
            column: name.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

struct ColumnLayout {
    date: usize,
    price: usize,
    open: usize,
    high: usize,
    low: usize,
    change: Option<usize>,
    volume: Option<usize>,
}

/// Convert a raw table into a chronologically ordered [`PriceSeries`].
///
/// Fails fast: the first missing column, malformed date or malformed number
/// aborts the operation and no partial series is produced.
pub fn normalize(table: &RawTable) -> Result<PriceSeries> {
    let layout = ColumnLayout {
        date: table.require_column(COL_DATE)?,
        price: table.require_column(COL_PRICE)?,
        open: table.require_column(COL_OPEN)?,
        high: table.require_column(COL_HIGH)?,
        low: table.require_column(COL_LOW)?,
        change: table.column_index(COL_CHANGE),
        volume: table.column_index(COL_VOLUME),
    };

    let records = table
        .rows
        .iter()
        .enumerate()
        .map(|(row, cells)| parse_row(row, cells, &layout))
        .collect::<Result<Vec<_>>>()?;

    if layout.volume.is_some() {
        let missing = records.iter().filter(|r| r.volume.is_none()).count();
        if missing > 0 && missing < records.len() {
            warn!(
                missing,
                rows = records.len(),
                "volume column has gaps; volume indicators will be empty"
            );
        }
    }

    let series = PriceSeries::from_records(records);
    if let Some((first, last)) = series.date_range() {
        debug!(rows = series.len(), %first, %last, "price table normalised");
    }
    Ok(series)
}

fn parse_row(row: usize, cells: &[String], layout: &ColumnLayout) -> Result<PriceRecord> {
    let cell = |idx: usize| cells.get(idx).map(String::as_str).unwrap_or("");

    let date_text = cell(layout.date);
    let date = parse_date(date_text).ok_or_else(|| Error::MalformedDate {
        row,
        value: date_text.to_string(),
    })?;

    let number = |idx: usize, column: &str| {
        let text = cell(idx);
        parse_grouped_number(text).ok_or_else(|| malformed(row, column, text))
    };

    let close = number(layout.price, COL_PRICE)?;
    let open = number(layout.open, COL_OPEN)?;
    let high = number(layout.high, COL_HIGH)?;
    let low = number(layout.low, COL_LOW)?;

    let change_pct = match layout.change {
        Some(idx) => parse_percent(cell(idx)).map_err(|_| malformed(row, COL_CHANGE, cell(idx)))?,
        None => None,
    };
    let volume = match layout.volume {
        Some(idx) => parse_volume(cell(idx)).map_err(|_| malformed(row, COL_VOLUME, cell(idx)))?,
        None => None,
    };

    Ok(PriceRecord {
        date,
        open,
        high,
        low,
        close,
        change_pct,
        volume,
    })
}

fn malformed(row: usize, column: &str, value: &str) -> Error {
    Error::MalformedNumber {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parse a calendar date from any of the supported layouts.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive())
}

/// Parse a number that may contain thousands separators, e.g. `"1,234.56"`.
pub fn parse_grouped_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    parse_finite(&cleaned)
}

/// Parse a percent string such as `"3.2%"` or `"-0.45%"`.  An empty cell is
/// `Ok(None)`; anything non-numeric is `Err(())`.
fn parse_percent(text: &str) -> std::result::Result<Option<f64>, ()> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let residual = text.strip_suffix('%').unwrap_or(text).trim();
    parse_finite(residual).map(Some).ok_or(())
}

/// Parse a traded volume such as `"1.23M"`, `"456.7K"` or `"12,345"`.
/// `"-"` and empty cells mean no volume was reported.
fn parse_volume(text: &str) -> std::result::Result<Option<f64>, ()> {
    let text = text.trim();
    if text.is_empty() || text == "-" {
        return Ok(None);
    }
    let (digits, scale) = match text.chars().last().map(|c| c.to_ascii_uppercase()) {
        Some('K') => (&text[..text.len() - 1], 1e3),
        Some('M') => (&text[..text.len() - 1], 1e6),
        Some('B') => (&text[..text.len() - 1], 1e9),
        Some('T') => (&text[..text.len() - 1], 1e12),
        _ => (text, 1.0),
    };
    parse_grouped_number(digits)
        .map(|v| Some(v * scale))
        .ok_or(())
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}
