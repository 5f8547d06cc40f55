// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (window + 1)
//   EMA_0  = x_0
//   EMA_t  = x_t * alpha + EMA_{t-1} * (1 - alpha)
//
// The recursion is seeded with the first value, so the EMA is defined from
// position 0 with no warm-up gap.  It is evaluated as
// `EMA_{t-1} + alpha * (x_t - EMA_{t-1})`, which keeps a constant input an
// exact fixed point.
// =============================================================================

use super::{check_window, Series};
use crate::error::Result;

/// EMA of a fully defined input.
///
/// # Edge cases
/// - `window == 0` => `InvalidParameter`
/// - empty input   => empty series
/// - `window == 1` => the input itself
pub fn calculate_ema(values: &[f64], window: usize) -> Result<Series> {
    check_window("ema.window", window)?;
    let alpha = smoothing_factor(window);

    let mut result = Vec::with_capacity(values.len());
    let mut prev_ema: Option<f64> = None;
    for &value in values {
        let ema = match prev_ema {
            Some(prev) => prev + alpha * (value - prev),
            None => value,
        };
        prev_ema = Some(ema);
        result.push(Some(ema));
    }
    Ok(result)
}

/// EMA of a series that may start with undefined cells.  The recursion is
/// seeded at the first defined value; undefined cells stay `None` and do not
/// advance the recursion.
pub fn ema_of_series(values: &[Option<f64>], window: usize) -> Result<Series> {
    check_window("ema.window", window)?;
    let alpha = smoothing_factor(window);

    let mut prev_ema: Option<f64> = None;
    let result = values
        .iter()
        .map(|value| {
            let value = (*value)?;
            let ema = match prev_ema {
                Some(prev) => prev + alpha * (value - prev),
                None => value,
            };
            prev_ema = Some(ema);
            Some(ema)
        })
        .collect();
    Ok(result)
}

fn smoothing_factor(window: usize) -> f64 {
    2.0 / (window as f64 + 1.0)
}
