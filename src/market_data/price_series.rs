use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single daily bar after normalisation.
///
/// `close` corresponds to the `Price` column of the raw table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub change_pct: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl PriceRecord {
    /// Build a record without the optional fields.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            change_pct: None,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_change_pct(mut self, change_pct: f64) -> Self {
        self.change_pct = Some(change_pct);
        self
    }
}

// ---------------------------------------------------------------------------
// PriceSeries -- immutable, chronologically ordered bars
// ---------------------------------------------------------------------------

/// Chronologically ordered bars.  Position in the series is the axis every
/// indicator aligns to, so the records are never reordered or mutated once the
/// series exists.
///
/// Serialises as a plain list of records; deserialising goes through
/// [`PriceSeries::from_records`] so the date order holds for every instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PriceRecord>", into = "Vec<PriceRecord>")]
pub struct PriceSeries {
    records: Vec<PriceRecord>,
}

impl PriceSeries {
    /// Build a series from records in any order.  Records are stably sorted by
    /// date; duplicate dates keep their input order.
    pub fn from_records(mut records: Vec<PriceRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.close).collect()
    }

    /// Volume for every bar, or `None` if any bar lacks it.
    pub fn volumes(&self) -> Option<Vec<f64>> {
        volumes_of(&self.records)
    }

    /// First and last date, if the series is non-empty.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }
}

impl From<Vec<PriceRecord>> for PriceSeries {
    fn from(records: Vec<PriceRecord>) -> Self {
        Self::from_records(records)
    }
}

impl From<PriceSeries> for Vec<PriceRecord> {
    fn from(series: PriceSeries) -> Self {
        series.records
    }
}

/// Volume column of `records`, all-or-nothing.
pub fn volumes_of(records: &[PriceRecord]) -> Option<Vec<f64>> {
    records.iter().map(|r| r.volume).collect()
}
