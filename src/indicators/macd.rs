// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD      = EMA(short) - EMA(long)
//   Signal    = EMA(signal) of MACD
//   Histogram = MACD - Signal
//
// All three lines inherit the EMA's seeding, so they are defined from
// position 0.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::ema::{calculate_ema, ema_of_series};
use super::{check_window, difference, Series};
use crate::error::Result;

/// The three MACD lines, each aligned with the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// Compute MACD from closing prices.
pub fn calculate_macd(
    closes: &[f64],
    short_window: usize,
    long_window: usize,
    signal_window: usize,
) -> Result<MacdSeries> {
    check_window("macd.short_window", short_window)?;
    check_window("macd.long_window", long_window)?;
    check_window("macd.signal_window", signal_window)?;

    let ema_short = calculate_ema(closes, short_window)?;
    let ema_long = calculate_ema(closes, long_window)?;
    macd_from_emas(&ema_short, &ema_long, signal_window)
}

/// Compute MACD from already computed short and long EMAs.
pub fn macd_from_emas(
    ema_short: &[Option<f64>],
    ema_long: &[Option<f64>],
    signal_window: usize,
) -> Result<MacdSeries> {
    check_window("macd.signal_window", signal_window)?;

    let macd = difference(ema_short, ema_long);
    let signal = ema_of_series(&macd, signal_window)?;
    let histogram = difference(&macd, &signal);
    Ok(MacdSeries {
        macd,
        signal,
        histogram,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn macd_constant_close_is_zero() {
        let closes = vec![250.5; 50];
        let m = calculate_macd(&closes, 12, 26, 9).unwrap();
        assert!(m.macd.iter().all(|v| *v == Some(0.0)));
        assert!(m.signal.iter().all(|v| *v == Some(0.0)));
        assert!(m.histogram.iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn signal_is_ema_of_macd() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 8.0).collect();
        let m = calculate_macd(&closes, 12, 26, 9).unwrap();
        let expected = ema_of_series(&m.macd, 9).unwrap();
        assert_eq!(m.signal, expected);
        for i in 0..closes.len() {
            let h = m.histogram[i].unwrap();
            assert!((h - (m.macd[i].unwrap() - m.signal[i].unwrap())).abs() < 1e-12);
        }
    }

    #[test]
    fn macd_defined_from_start() {
        let closes = [10.0, 11.0, 12.0];
        let m = calculate_macd(&closes, 12, 26, 9).unwrap();
        assert_eq!(m.macd[0], Some(0.0));
        assert!(m.macd.iter().all(Option::is_some));
    }

    #[test]
    fn rising_prices_give_positive_macd() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let m = calculate_macd(&closes, 12, 26, 9).unwrap();
        assert!(m.macd[59].unwrap() > 0.0);
    }

    #[test]
    fn macd_rejects_zero_windows() {
        for (s, l, g) in [(0, 26, 9), (12, 0, 9), (12, 26, 0)] {
            assert!(matches!(
                calculate_macd(&[1.0, 2.0], s, l, g),
                Err(Error::InvalidParameter { .. })
            ));
        }
    }
}
