// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the trailing *sample* standard
// deviation (n - 1 denominator) over the same window.
//
// Warm-up matches the SMA: the first `window - 1` positions have no value.
// A one-point window has no sample spread; σ is taken as 0 there.

use serde::{Deserialize, Serialize};

use super::sma::calculate_sma;
use super::{check_window, Series};
use crate::error::{Error, Result};

/// Result of a Bollinger Band calculation, each line aligned with the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerSeries {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// - `upper`  = SMA + `num_std` * σ
/// - `middle` = SMA
/// - `lower`  = SMA - `num_std` * σ
///
/// Fails with `InvalidParameter` when `window == 0` or `num_std` is negative
/// or non-finite.
pub fn calculate_bollinger(closes: &[f64], window: usize, num_std: f64) -> Result<BollingerSeries> {
    check_window("bollinger.window", window)?;
    check_num_std(num_std)?;

    let middle = calculate_sma(closes, window)?;
    let std_dev = rolling_std(closes, window)?;
    bands_from_parts(middle, &std_dev, num_std)
}

/// Assemble the bands from an already computed middle band and rolling σ.
pub fn bands_from_parts(middle: Series, std_dev: &[Option<f64>], num_std: f64) -> Result<BollingerSeries> {
    check_num_std(num_std)?;

    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());
    for (mid, sd) in middle.iter().zip(std_dev) {
        match (mid, sd) {
            (Some(mid), Some(sd)) => {
                let offset = num_std * sd;
                upper.push(Some(mid + offset));
                lower.push(Some(mid - offset));
            }
            _ => {
                upper.push(None);
                lower.push(None);
            }
        }
    }

    Ok(BollingerSeries {
        upper,
        middle,
        lower,
    })
}

/// Trailing sample standard deviation over `window` points.
pub fn rolling_std(values: &[f64], window: usize) -> Result<Series> {
    check_window("bollinger.window", window)?;

    let mut out = vec![None; values.len()];
    if values.len() < window {
        return Ok(out);
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        if window == 1 {
            out[i] = Some(0.0);
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        out[i] = Some(variance.sqrt());
    }
    Ok(out)
}

fn check_num_std(num_std: f64) -> Result<()> {
    if !num_std.is_finite() || num_std < 0.0 {
        return Err(Error::invalid("bollinger.num_std", num_std));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        let (upper, middle, lower) = (bb.upper[19].unwrap(), bb.middle[19].unwrap(), bb.lower[19].unwrap());
        assert!(upper > middle);
        assert!(lower < middle);
        assert!((middle - 10.5).abs() < 1e-10);
        // sample std of 1..=20 = sqrt(35)
        assert!((upper - middle - 2.0 * 35f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn bollinger_warm_up_matches_sma() {
        let closes: Vec<f64> = (1..=25).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        for line in [&bb.upper, &bb.middle, &bb.lower] {
            assert!(line[..19].iter().all(Option::is_none));
            assert!(line[19..].iter().all(Option::is_some));
        }
    }

    #[test]
    fn bands_symmetric_around_middle() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.9).cos() * 4.0).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        for i in 19..closes.len() {
            let (u, m, l) = (bb.upper[i].unwrap(), bb.middle[i].unwrap(), bb.lower[i].unwrap());
            assert!(((u - m) - (m - l)).abs() < 1e-9, "asymmetric at {i}");
        }
    }

    #[test]
    fn bollinger_insufficient_data() {
        let bb = calculate_bollinger(&[1.0, 2.0, 3.0], 20, 2.0).unwrap();
        assert!(bb.middle.iter().all(Option::is_none));
    }

    #[test]
    fn bollinger_flat_collapses() {
        let closes = vec![100.0; 20];
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        assert_eq!(bb.upper[19], Some(100.0));
        assert_eq!(bb.lower[19], Some(100.0));
    }

    #[test]
    fn single_point_window_has_zero_spread() {
        let bb = calculate_bollinger(&[5.0, 7.0], 1, 2.0).unwrap();
        assert_eq!(bb.upper, vec![Some(5.0), Some(7.0)]);
        assert_eq!(bb.lower, vec![Some(5.0), Some(7.0)]);
    }

    #[test]
    fn bad_parameters() {
        assert!(calculate_bollinger(&[1.0], 0, 2.0).is_err());
        assert!(calculate_bollinger(&[1.0], 20, -1.0).is_err());
        assert!(calculate_bollinger(&[1.0], 20, f64::NAN).is_err());
    }
}
