// =============================================================================
// Accumulation/Distribution Line (A/D Line)
// =============================================================================
//
// Money Flow Multiplier:
//   MFM = ((close - low) - (high - close)) / (high - low)
//   (0 when high == low)
//
// Money Flow Volume:
//   MFV = MFM * volume
//
// A/D Line = cumulative sum of MFV, defined from position 0.
//
// MFV is shared with Chaikin Money Flow.
// =============================================================================

use super::Series;
use crate::market_data::price_series::volumes_of;
use crate::market_data::PriceRecord;

/// Where the close sits inside the bar's range, scaled to [-1, 1].
pub fn money_flow_multiplier(bar: &PriceRecord) -> f64 {
    let range = bar.high - bar.low;
    if range == 0.0 {
        return 0.0;
    }
    ((bar.close - bar.low) - (bar.high - bar.close)) / range
}

/// Money Flow Volume per bar, or `None` if any bar lacks volume.
pub fn money_flow_volume(records: &[PriceRecord]) -> Option<Vec<f64>> {
    let volumes = volumes_of(records)?;
    Some(
        records
            .iter()
            .zip(volumes)
            .map(|(bar, volume)| money_flow_multiplier(bar) * volume)
            .collect(),
    )
}

/// A/D Line from precomputed Money Flow Volume.
pub fn ad_line_from_money_flow(mfv: Option<&[f64]>, len: usize) -> Series {
    let Some(mfv) = mfv else {
        return vec![None; len];
    };
    let mut total = 0.0;
    mfv.iter()
        .map(|v| {
            total += v;
            Some(total)
        })
        .collect()
}

pub fn calculate_ad_line(records: &[PriceRecord]) -> Series {
    let mfv = money_flow_volume(records);
    ad_line_from_money_flow(mfv.as_deref(), records.len())
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(i: u64, high: f64, low: f64, close: f64, volume: f64) -> PriceRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i);
        PriceRecord::new(date, close, high, low, close).with_volume(volume)
    }

    #[test]
    fn multiplier_range() {
        assert_eq!(money_flow_multiplier(&bar(0, 10.0, 0.0, 10.0, 1.0)), 1.0);
        assert_eq!(money_flow_multiplier(&bar(0, 10.0, 0.0, 0.0, 1.0)), -1.0);
        assert_eq!(money_flow_multiplier(&bar(0, 10.0, 0.0, 5.0, 1.0)), 0.0);
        assert_eq!(money_flow_multiplier(&bar(0, 7.0, 7.0, 7.0, 1.0)), 0.0);
    }

    #[test]
    fn ad_line_accumulates() {
        let data = vec![
            bar(0, 10.0, 0.0, 10.0, 100.0), // +100
            bar(1, 10.0, 0.0, 2.5, 200.0),  // -100
            bar(2, 10.0, 0.0, 7.5, 40.0),   // +20
        ];
        assert_eq!(
            calculate_ad_line(&data),
            vec![Some(100.0), Some(0.0), Some(20.0)]
        );
    }

    #[test]
    fn ad_line_without_volume() {
        let mut data = vec![bar(0, 10.0, 0.0, 10.0, 100.0)];
        data[0].volume = None;
        assert_eq!(calculate_ad_line(&data), vec![None]);
    }
}
