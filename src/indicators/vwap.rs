// =============================================================================
// Volume-Weighted Average Price (VWAP)
// =============================================================================
//
//   VWAP_t = Σ(close_i * volume_i) / Σ(volume_i),  i = 0..=t
//
// Cumulative over the whole series.  While the cumulative volume is still
// zero the VWAP reads the bar's own close.

use super::Series;
use crate::market_data::price_series::volumes_of;
use crate::market_data::PriceRecord;

/// Running VWAP for every bar, or an all-`None` series if any bar lacks volume.
pub fn calculate_vwap(records: &[PriceRecord]) -> Series {
    let Some(volumes) = volumes_of(records) else {
        return vec![None; records.len()];
    };

    let mut cum_pv = 0.0;
    let mut cum_volume = 0.0;
    records
        .iter()
        .zip(volumes)
        .map(|(bar, volume)| {
            cum_pv += bar.close * volume;
            cum_volume += volume;
            Some(if cum_volume == 0.0 {
                bar.close
            } else {
                cum_pv / cum_volume
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars(closes_volumes: &[(f64, f64)]) -> Vec<PriceRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes_volumes
            .iter()
            .enumerate()
            .map(|(i, &(c, v))| PriceRecord::new(start + chrono::Days::new(i as u64), c, c, c, c).with_volume(v))
            .collect()
    }

    #[test]
    fn vwap_weights_by_volume() {
        let data = bars(&[(10.0, 100.0), (20.0, 300.0), (30.0, 100.0)]);
        let vwap = calculate_vwap(&data);
        assert_eq!(vwap[0], Some(10.0));
        assert!((vwap[1].unwrap() - 17.5).abs() < 1e-10);
        assert!((vwap[2].unwrap() - 20.0).abs() < 1e-10);
    }

    #[test]
    fn zero_volume_reads_close() {
        let data = bars(&[(10.0, 0.0), (12.0, 0.0), (14.0, 10.0)]);
        let vwap = calculate_vwap(&data);
        assert_eq!(vwap, vec![Some(10.0), Some(12.0), Some(14.0)]);
    }

    #[test]
    fn missing_volume() {
        let mut data = bars(&[(10.0, 1.0), (12.0, 1.0)]);
        data[1].volume = None;
        assert_eq!(calculate_vwap(&data), vec![None, None]);
    }
}
