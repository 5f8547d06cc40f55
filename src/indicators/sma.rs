// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// SMA_t = (x_{t-window+1} + ... + x_t) / window
//
// The first `window - 1` positions have no value.  Each mean is taken over its
// own trailing slice (no running sum), so a result is exactly the mean of the
// corresponding window.
// =============================================================================

use super::{check_window, Series};
use crate::error::Result;

/// SMA of a fully defined input.
pub fn calculate_sma(values: &[f64], window: usize) -> Result<Series> {
    check_window("sma.window", window)?;

    let mut out = vec![None; values.len()];
    if values.len() < window {
        return Ok(out);
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        out[i] = Some(slice.iter().sum::<f64>() / window as f64);
    }
    Ok(out)
}

/// SMA of a series that may itself have a warm-up gap.  A position is defined
/// only when every value in its trailing window is defined.
pub fn sma_of_series(values: &[Option<f64>], window: usize) -> Result<Series> {
    check_window("sma.window", window)?;

    let mut out = vec![None; values.len()];
    if values.len() < window {
        return Ok(out);
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        out[i] = slice
            .iter()
            .copied()
            .sum::<Option<f64>>()
            .map(|sum| sum / window as f64);
    }
    Ok(out)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn sma_window_zero_is_invalid() {
        assert!(matches!(
            calculate_sma(&[1.0, 2.0], 0),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn sma_insufficient_history_is_all_none() {
        let out = calculate_sma(&[1.0, 2.0, 3.0], 5).unwrap();
        assert_eq!(out, vec![None, None, None]);
    }

    #[test]
    fn sma_defined_count_and_values() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64 * 1.7).collect();
        let window = 4;
        let out = calculate_sma(&values, window).unwrap();
        assert_eq!(out.len(), values.len());
        assert_eq!(out.iter().filter(|v| v.is_some()).count(), values.len() - window + 1);
        for (i, v) in out.iter().enumerate() {
            if i + 1 < window {
                assert!(v.is_none());
            } else {
                let slice = &values[i + 1 - window..=i];
                let mean = slice.iter().sum::<f64>() / window as f64;
                assert_eq!(*v, Some(mean));
            }
        }
    }

    #[test]
    fn sma_window_one_is_identity() {
        let values = [3.0, 1.5, 9.25];
        let out = calculate_sma(&values, 1).unwrap();
        assert_eq!(out, vec![Some(3.0), Some(1.5), Some(9.25)]);
    }

    #[test]
    fn sma_of_series_skips_gap() {
        let values = [None, Some(2.0), Some(4.0), Some(6.0)];
        let out = sma_of_series(&values, 2).unwrap();
        assert_eq!(out, vec![None, None, Some(3.0), Some(5.0)]);
    }
}
