// =============================================================================
// Stochastic Oscillator
// =============================================================================
//
//   %K_t = (close_t - lowest_low) / (highest_high - lowest_low) * 100
//   %D   = SMA(smooth) of %K
//
// Highest high / lowest low are taken over the trailing `window` bars.  A bar
// window with no range (highest == lowest) reads 50.
//
// Thresholds:  %K >= 80 => OVERBOUGHT,  %K <= 20 => OVERSOLD.

use serde::{Deserialize, Serialize};

use super::sma::sma_of_series;
use super::{check_window, Series};
use crate::error::Result;
use crate::market_data::PriceRecord;

pub const OVERBOUGHT: f64 = 80.0;
pub const OVERSOLD: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticSeries {
    pub k: Series,
    pub d: Series,
}

/// %K over `window` bars and %D smoothed over `smooth` %K values.
///
/// %K has no value for the first `window - 1` bars, %D for the first
/// `window + smooth - 2`.
pub fn calculate_stochastic(records: &[PriceRecord], window: usize, smooth: usize) -> Result<StochasticSeries> {
    check_window("stochastic.window", window)?;
    check_window("stochastic.smooth", smooth)?;

    let mut k = vec![None; records.len()];
    if records.len() >= window {
        for i in (window - 1)..records.len() {
            let slice = &records[i + 1 - window..=i];
            let highest = slice.iter().map(|r| r.high).fold(f64::NEG_INFINITY, f64::max);
            let lowest = slice.iter().map(|r| r.low).fold(f64::INFINITY, f64::min);
            let range = highest - lowest;
            k[i] = Some(if range == 0.0 {
                50.0
            } else {
                (records[i].close - lowest) / range * 100.0
            });
        }
    }

    let d = sma_of_series(&k, smooth)?;
    Ok(StochasticSeries { k, d })
}

pub fn stochastic_label(value: f64) -> &'static str {
    if value >= OVERBOUGHT {
        "OVERBOUGHT"
    } else if value <= OVERSOLD {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}
