// =============================================================================
// Average True Range (ATR)
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR_0 = H - L
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is the simple moving average of TR over `window` bars, so the first
// `window - 1` positions have no value.
//
// Default window: 14
// =============================================================================

use super::sma::calculate_sma;
use super::{check_window, Series};
use crate::error::Result;
use crate::market_data::PriceRecord;

/// True Range for every bar (oldest first).  The first bar has no previous
/// close and uses its own high-low range.
pub fn true_range(records: &[PriceRecord]) -> Vec<f64> {
    let mut tr_values = Vec::with_capacity(records.len());
    for (i, bar) in records.iter().enumerate() {
        let hl = bar.high - bar.low;
        let tr = match i.checked_sub(1).map(|p| records[p].close) {
            Some(prev_close) => {
                let hc = (bar.high - prev_close).abs();
                let lc = (bar.low - prev_close).abs();
                hl.max(hc).max(lc)
            }
            None => hl,
        };
        tr_values.push(tr);
    }
    tr_values
}

/// ATR series over `window` bars.
pub fn calculate_atr(records: &[PriceRecord], window: usize) -> Result<Series> {
    check_window("atr.window", window)?;
    calculate_sma(&true_range(records), window)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Build a test bar with the given OHLC values on consecutive days.
    fn bar(i: usize, open: f64, high: f64, low: f64, close: f64) -> PriceRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64);
        PriceRecord::new(date, open, high, low, close)
    }

    #[test]
    fn atr_window_zero() {
        let bars = vec![bar(0, 100.0, 105.0, 95.0, 102.0)];
        assert!(calculate_atr(&bars, 0).is_err());
    }

    #[test]
    fn atr_insufficient_data() {
        let bars: Vec<_> = (0..10).map(|i| bar(i, 100.0, 105.0, 95.0, 102.0)).collect();
        let atr = calculate_atr(&bars, 14).unwrap();
        assert_eq!(atr.len(), 10);
        assert!(atr.iter().all(Option::is_none));
    }

    #[test]
    fn true_range_uses_prev_close() {
        // Gap scenario: |H - prevClose| > H - L
        let bars = vec![
            bar(0, 100.0, 105.0, 95.0, 95.0),
            bar(1, 110.0, 115.0, 108.0, 112.0),
            bar(2, 112.0, 113.0, 90.0, 100.0),
        ];
        assert_eq!(true_range(&bars), vec![10.0, 20.0, 23.0]);
    }

    #[test]
    fn atr_is_mean_of_true_range() {
        let bars = vec![
            bar(0, 100.0, 102.0, 98.0, 101.0),
            bar(1, 101.0, 104.0, 99.0, 103.0),
            bar(2, 103.0, 106.0, 100.0, 105.0),
            bar(3, 105.0, 108.0, 102.0, 107.0),
        ];
        // TR = [4, 5, 6, 6]
        let atr = calculate_atr(&bars, 3).unwrap();
        assert_eq!(atr[0], None);
        assert_eq!(atr[1], None);
        assert!((atr[2].unwrap() - 5.0).abs() < 1e-10);
        assert!((atr[3].unwrap() - 17.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn atr_constant_range() {
        let bars: Vec<_> = (0..30)
            .map(|i| {
                let base = 100.0 + i as f64 * 0.1;
                bar(i, base, base + 5.0, base - 5.0, base)
            })
            .collect();
        let atr = calculate_atr(&bars, 14).unwrap();
        let last = atr[29].unwrap();
        assert!((last - 10.0).abs() < 0.2, "expected ATR near 10.0, got {last}");
    }
}
