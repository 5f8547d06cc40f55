// =============================================================================
// On-Balance Volume (OBV)
// =============================================================================
//
//   OBV_0 = 0
//   OBV_t = OBV_{t-1} + volume_t   if close_t > close_{t-1}
//         = OBV_{t-1} - volume_t   if close_t < close_{t-1}
//         = OBV_{t-1}              otherwise
//
// Cumulative, so defined from position 0 when every bar carries volume.

use super::Series;
use crate::market_data::price_series::volumes_of;
use crate::market_data::PriceRecord;

/// OBV for every bar, or an all-`None` series if any bar lacks volume.
pub fn calculate_obv(records: &[PriceRecord]) -> Series {
    let Some(volumes) = volumes_of(records) else {
        return vec![None; records.len()];
    };

    let mut obv = 0.0;
    let mut result = Vec::with_capacity(records.len());
    for (i, bar) in records.iter().enumerate() {
        if i > 0 {
            let prev_close = records[i - 1].close;
            if bar.close > prev_close {
                obv += volumes[i];
            } else if bar.close < prev_close {
                obv -= volumes[i];
            }
        }
        result.push(Some(obv));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars(closes_volumes: &[(f64, Option<f64>)]) -> Vec<PriceRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes_volumes
            .iter()
            .enumerate()
            .map(|(i, &(c, v))| PriceRecord {
                volume: v,
                ..PriceRecord::new(start + chrono::Days::new(i as u64), c, c, c, c)
            })
            .collect()
    }

    #[test]
    fn obv_adds_and_subtracts() {
        let data = bars(&[
            (10.0, Some(100.0)),
            (11.0, Some(200.0)),
            (11.0, Some(50.0)),
            (9.0, Some(300.0)),
            (12.0, Some(25.0)),
        ]);
        let obv = calculate_obv(&data);
        assert_eq!(
            obv,
            vec![Some(0.0), Some(200.0), Some(200.0), Some(-100.0), Some(-75.0)]
        );
    }

    #[test]
    fn obv_without_volume_is_empty() {
        let data = bars(&[(10.0, Some(100.0)), (11.0, None)]);
        assert_eq!(calculate_obv(&data), vec![None, None]);
    }
}
