// =============================================================================
// Relative Strength Index (RSI) — simple rolling averages
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — gain_t = max(close_t - close_{t-1}, 0)
//          loss_t = max(close_{t-1} - close_t, 0)
// Step 2 — avg_gain / avg_loss = arithmetic mean over the trailing `window`
//          changes (the change at t uses close_{t-1}, so position 0 has none).
// Step 3 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// The first `window` positions have no value.  When avg_loss is zero the RSI is
// exactly 100, including a perfectly flat window.
//
// Thresholds:  RSI >= 70 => OVERBOUGHT,  RSI <= 30 => OVERSOLD.
// =============================================================================

use super::{check_window, Series};
use crate::error::Result;

pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;

/// Compute the RSI series for `closes` over a trailing `window` of changes.
///
/// # Edge cases
/// - `window == 0` => `InvalidParameter`
/// - `closes.len() <= window` => every position `None`
/// - zero average loss => 100.0
pub fn calculate_rsi(closes: &[f64], window: usize) -> Result<Series> {
    check_window("rsi.window", window)?;

    let n = closes.len();
    let mut result = vec![None; n];
    if n <= window {
        return Ok(result);
    }

    // gains[i] / losses[i] describe the move into bar i; index 0 is unused.
    let mut gains = vec![0.0; n];
    let mut losses = vec![0.0; n];
    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else if delta < 0.0 {
            losses[i] = -delta;
        }
    }

    let window_f = window as f64;
    for i in window..n {
        let start = i + 1 - window;
        let avg_gain = gains[start..=i].iter().sum::<f64>() / window_f;
        let avg_loss = losses[start..=i].iter().sum::<f64>() / window_f;
        result[i] = rsi_from_averages(avg_gain, avg_loss);
    }

    Ok(result)
}

/// Label an RSI reading the way the advisory layer reports it.
pub fn rsi_label(value: f64) -> &'static str {
    if value >= OVERBOUGHT {
        "OVERBOUGHT"
    } else if value <= OVERSOLD {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If average loss is zero, RSI is 100.0.
/// - Returns `None` when the inputs themselves are non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi)
    } else {
        None
    }
}
