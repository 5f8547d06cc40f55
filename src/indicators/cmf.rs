// =============================================================================
// Chaikin Money Flow (CMF)
// =============================================================================
//
//   CMF_t = Σ MFV / Σ volume   over the trailing `window` bars
//
// The first `window - 1` positions have no value.  A window with no traded
// volume reads 0.

use super::ad_line::money_flow_volume;
use super::{check_window, Series};
use crate::error::Result;
use crate::market_data::price_series::volumes_of;
use crate::market_data::PriceRecord;

/// CMF from precomputed Money Flow Volume and volume columns.
pub fn cmf_from_money_flow(mfv: &[f64], volumes: &[f64], window: usize) -> Result<Series> {
    check_window("cmf.window", window)?;

    let n = mfv.len().min(volumes.len());
    let mut out = vec![None; n];
    if n < window {
        return Ok(out);
    }
    for i in (window - 1)..n {
        let start = i + 1 - window;
        let flow: f64 = mfv[start..=i].iter().sum();
        let volume: f64 = volumes[start..=i].iter().sum();
        out[i] = Some(if volume == 0.0 { 0.0 } else { flow / volume });
    }
    Ok(out)
}

/// CMF for every bar, or an all-`None` series if any bar lacks volume.
pub fn calculate_cmf(records: &[PriceRecord], window: usize) -> Result<Series> {
    check_window("cmf.window", window)?;
    match (money_flow_volume(records), volumes_of(records)) {
        (Some(mfv), Some(volumes)) => cmf_from_money_flow(&mfv, &volumes, window),
        _ => Ok(vec![None; records.len()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(i: u64, high: f64, low: f64, close: f64, volume: f64) -> PriceRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i);
        PriceRecord::new(date, close, high, low, close).with_volume(volume)
    }

    #[test]
    fn cmf_ratio_of_sums() {
        let data = vec![
            bar(0, 10.0, 0.0, 10.0, 100.0), // MFV +100
            bar(1, 10.0, 0.0, 2.5, 200.0),  // MFV -100
            bar(2, 10.0, 0.0, 7.5, 100.0),  // MFV +50
        ];
        let cmf = calculate_cmf(&data, 2).unwrap();
        assert_eq!(cmf[0], None);
        assert!((cmf[1].unwrap() - 0.0).abs() < 1e-12);
        assert!((cmf[2].unwrap() - (-50.0 / 300.0)).abs() < 1e-12);
    }

    #[test]
    fn cmf_zero_volume_reads_zero() {
        let data = vec![bar(0, 10.0, 0.0, 10.0, 0.0), bar(1, 10.0, 0.0, 0.0, 0.0)];
        assert_eq!(calculate_cmf(&data, 2).unwrap(), vec![None, Some(0.0)]);
    }

    #[test]
    fn cmf_bounded() {
        let data: Vec<_> = (0..30)
            .map(|i| {
                let c = 50.0 + (i as f64).sin() * 3.0;
                bar(i, c + 2.0, c - 1.0, c, 1_000.0 + i as f64 * 10.0)
            })
            .collect();
        for v in calculate_cmf(&data, 20).unwrap().iter().flatten() {
            assert!((-1.0..=1.0).contains(v));
        }
    }

    #[test]
    fn cmf_window_zero() {
        assert!(calculate_cmf(&[], 0).is_err());
    }
}
