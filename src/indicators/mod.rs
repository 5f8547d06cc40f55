// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicator battery.  Every
// function returns a [`Series`] aligned index-for-index with its input:
// positions still inside the warm-up window hold `None`, never a sentinel
// float.  Window-based functions reject `window == 0` with
// `Error::InvalidParameter`; short inputs simply yield `None` cells.

pub mod ad_line;
pub mod atr;
pub mod bollinger;
pub mod cmf;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod vwap;

pub use bollinger::BollingerSeries;
pub use macd::MacdSeries;
pub use stochastic::StochasticSeries;

use crate::error::{Error, Result};

/// One value per bar; `None` where the indicator is not yet defined.
pub type Series = Vec<Option<f64>>;

/// Reject non-positive look-back windows.
pub(crate) fn check_window(name: &'static str, window: usize) -> Result<()> {
    if window == 0 {
        return Err(Error::invalid(name, window));
    }
    Ok(())
}

/// Wrap every value as defined.
pub(crate) fn defined(values: &[f64]) -> Series {
    values.iter().copied().map(Some).collect()
}

/// Element-wise `a - b`, defined where both sides are.
pub(crate) fn difference(a: &[Option<f64>], b: &[Option<f64>]) -> Series {
    a.iter()
        .zip(b)
        .map(|(x, y)| Some((*x)? - (*y)?))
        .collect()
}
