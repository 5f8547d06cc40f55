// =============================================================================
// Enriched table — price series plus indicator columns
// =============================================================================
//
// The single artifact handed to downstream consumers: the normalised bars and
// one row-aligned column per indicator output, with empty cells where an
// indicator has not finished warming up.

use std::io::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::IndicatorKind;
use crate::error::Result;
use crate::indicators::{rsi, stochastic, Series};
use crate::market_data::normalizer::{
    COL_CHANGE, COL_DATE, COL_HIGH, COL_LOW, COL_OPEN, COL_PRICE,
};
use crate::market_data::PriceSeries;

// ---------------------------------------------------------------------------
// IndicatorSet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorColumn {
    pub name: String,
    pub values: Series,
}

/// Named indicator columns in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    columns: Vec<IndicatorColumn>,
}

impl IndicatorSet {
    /// Add a column, replacing any existing column with the same name.
    pub fn insert(&mut self, name: impl Into<String>, values: Series) {
        let name = name.into();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(IndicatorColumn { name, values }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.values)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[IndicatorColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// ---------------------------------------------------------------------------
// EnrichedTable
// ---------------------------------------------------------------------------

/// An indicator that could not be computed during a battery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFailure {
    pub indicator: IndicatorKind,
    pub message: String,
}

/// Bookkeeping for one battery run: intermediate series computed, and how
/// many requests were served from the per-run cache instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub computed: usize,
    pub reused: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTable {
    pub series: PriceSeries,
    pub indicators: IndicatorSet,
    pub failures: Vec<IndicatorFailure>,
    pub stats: RunStats,
}

/// Price columns written ahead of the indicators.  Volume feeds the volume
/// indicators but is not written back.
const BASE_COLUMNS: [&str; 6] = [COL_DATE, COL_PRICE, COL_OPEN, COL_HIGH, COL_LOW, COL_CHANGE];

impl EnrichedTable {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Base price columns followed by every indicator column.
    pub fn headers(&self) -> Vec<String> {
        BASE_COLUMNS
            .iter()
            .map(|s| s.to_string())
            .chain(self.indicators.names().into_iter().map(str::to_string))
            .collect()
    }

    /// Indicator value at `row`, `None` for warm-up cells or unknown columns.
    pub fn value(&self, column: &str, row: usize) -> Option<f64> {
        self.indicators.get(column)?.get(row).copied().flatten()
    }

    /// Write the table as CSV.  Undefined cells are left empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.headers())?;

        for (row, bar) in self.series.records().iter().enumerate() {
            let mut record = vec![
                bar.date.format("%Y-%m-%d").to_string(),
                bar.close.to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                cell(bar.change_pct),
            ];
            record.extend(
                self.indicators
                    .columns()
                    .iter()
                    .map(|c| cell(c.values.get(row).copied().flatten())),
            );
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every indicator reading on the most recent bar.
    pub fn latest(&self) -> Option<Snapshot> {
        let last = self.series.len().checked_sub(1)?;
        let bar = &self.series.records()[last];

        let values: Vec<(String, Option<f64>)> = self
            .indicators
            .columns()
            .iter()
            .map(|c| (c.name.clone(), c.values.get(last).copied().flatten()))
            .collect();

        let rsi_column = IndicatorKind::RelativeStrengthIndex.columns()[0];
        let k_column = IndicatorKind::Stochastic.columns()[0];

        Some(Snapshot {
            date: bar.date,
            close: bar.close,
            rsi_label: self.value(rsi_column, last).map(rsi::rsi_label),
            stochastic_label: self.value(k_column, last).map(stochastic::stochastic_label),
            values,
        })
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Readings for a single bar, with the oscillator zones spelled out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub values: Vec<(String, Option<f64>)>,
    pub rsi_label: Option<&'static str>,
    pub stochastic_label: Option<&'static str>,
}
