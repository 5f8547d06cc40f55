// =============================================================================
// Indicator catalogue
// =============================================================================
//
// Names, output columns, categories and one-line definitions for every member
// of the battery.  Downstream consumers use this to describe the columns of an
// enriched table without knowing how they were computed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorCategory {
    Trend,
    Momentum,
    Volatility,
    Volume,
    MarketStrength,
}

impl std::fmt::Display for IndicatorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trend => write!(f, "Trend"),
            Self::Momentum => write!(f, "Momentum"),
            Self::Volatility => write!(f, "Volatility"),
            Self::Volume => write!(f, "Volume"),
            Self::MarketStrength => write!(f, "Market Strength"),
        }
    }
}

/// One computation in the battery.  Some produce several output columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    MovingAverage,
    ExponentialMovingAverage,
    RelativeStrengthIndex,
    Macd,
    BollingerBands,
    AverageTrueRange,
    Stochastic,
    OnBalanceVolume,
    Vwap,
    AccumulationDistribution,
    ChaikinMoneyFlow,
}

impl IndicatorKind {
    /// Every indicator, in the column order of an enriched table.
    pub const ALL: [IndicatorKind; 11] = [
        Self::MovingAverage,
        Self::ExponentialMovingAverage,
        Self::RelativeStrengthIndex,
        Self::Macd,
        Self::BollingerBands,
        Self::AverageTrueRange,
        Self::Stochastic,
        Self::OnBalanceVolume,
        Self::Vwap,
        Self::AccumulationDistribution,
        Self::ChaikinMoneyFlow,
    ];

    /// Output column names, in order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::MovingAverage => &["Moving Average"],
            Self::ExponentialMovingAverage => &["Exponential Moving Average"],
            Self::RelativeStrengthIndex => &["RSI"],
            Self::Macd => &["MACD", "MACD Signal", "MACD Histogram"],
            Self::BollingerBands => &["Upper Band", "Lower Band", "Bollinger Moving Average"],
            Self::AverageTrueRange => &["ATR"],
            Self::Stochastic => &["Stochastic %K", "Stochastic %D"],
            Self::OnBalanceVolume => &["OBV"],
            Self::Vwap => &["VWAP"],
            Self::AccumulationDistribution => &["A/D Line"],
            Self::ChaikinMoneyFlow => &["CMF"],
        }
    }

    pub fn category(self) -> IndicatorCategory {
        match self {
            Self::MovingAverage | Self::ExponentialMovingAverage | Self::Macd => {
                IndicatorCategory::Trend
            }
            Self::RelativeStrengthIndex | Self::Stochastic => IndicatorCategory::Momentum,
            Self::BollingerBands | Self::AverageTrueRange => IndicatorCategory::Volatility,
            Self::OnBalanceVolume | Self::Vwap => IndicatorCategory::Volume,
            Self::AccumulationDistribution | Self::ChaikinMoneyFlow => {
                IndicatorCategory::MarketStrength
            }
        }
    }

    /// Whether the indicator needs a volume column.
    pub fn uses_volume(self) -> bool {
        matches!(
            self,
            Self::OnBalanceVolume | Self::Vwap | Self::AccumulationDistribution | Self::ChaikinMoneyFlow
        )
    }

    pub fn definition(self) -> &'static str {
        match self {
            Self::MovingAverage => "Arithmetic mean of the closing price over a trailing window.",
            Self::ExponentialMovingAverage => {
                "Moving average that weights recent closes more heavily."
            }
            Self::RelativeStrengthIndex => {
                "Momentum oscillator comparing average gains to average losses, scaled 0-100."
            }
            Self::Macd => {
                "Difference between a short and a long EMA, with an EMA signal line."
            }
            Self::BollingerBands => {
                "Moving average with bands a number of standard deviations above and below."
            }
            Self::AverageTrueRange => "Average of the true range, a measure of volatility.",
            Self::Stochastic => "Position of the close within the recent high-low range, 0-100.",
            Self::OnBalanceVolume => {
                "Running volume total, added on up closes and subtracted on down closes."
            }
            Self::Vwap => "Cumulative volume-weighted average of the closing price.",
            Self::AccumulationDistribution => {
                "Cumulative money flow volume into and out of the security."
            }
            Self::ChaikinMoneyFlow => {
                "Money flow volume over a window divided by volume over the same window."
            }
        }
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::MovingAverage => "Simple Moving Average (SMA)",
            Self::ExponentialMovingAverage => "Exponential Moving Average (EMA)",
            Self::RelativeStrengthIndex => "Relative Strength Index (RSI)",
            Self::Macd => "Moving Average Convergence Divergence (MACD)",
            Self::BollingerBands => "Bollinger Bands",
            Self::AverageTrueRange => "Average True Range (ATR)",
            Self::Stochastic => "Stochastic Oscillator",
            Self::OnBalanceVolume => "On-Balance Volume (OBV)",
            Self::Vwap => "Volume-Weighted Average Price (VWAP)",
            Self::AccumulationDistribution => "Accumulation/Distribution Line (A/D Line)",
            Self::ChaikinMoneyFlow => "Chaikin Money Flow (CMF)",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn column_names_are_unique() {
        let mut seen = HashSet::new();
        for kind in IndicatorKind::ALL {
            for col in kind.columns() {
                assert!(seen.insert(*col), "duplicate column {col}");
            }
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn volume_indicators_are_flagged() {
        let volume: Vec<_> = IndicatorKind::ALL.into_iter().filter(|k| k.uses_volume()).collect();
        assert_eq!(volume.len(), 4);
        assert!(!IndicatorKind::AverageTrueRange.uses_volume());
    }

    #[test]
    fn categories_and_definitions() {
        assert_eq!(IndicatorKind::Stochastic.category(), IndicatorCategory::Momentum);
        assert_eq!(IndicatorKind::Macd.category(), IndicatorCategory::Trend);
        assert_eq!(IndicatorKind::AverageTrueRange.category(), IndicatorCategory::Volatility);
        assert_eq!(IndicatorKind::Vwap.category(), IndicatorCategory::Volume);
        assert_eq!(
            IndicatorKind::ChaikinMoneyFlow.category(),
            IndicatorCategory::MarketStrength
        );
        for kind in IndicatorKind::ALL {
            assert!(!kind.definition().is_empty(), "{kind} has no definition");
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(IndicatorKind::Macd.to_string(), "Moving Average Convergence Divergence (MACD)");
        assert_eq!(IndicatorCategory::MarketStrength.to_string(), "Market Strength");
    }
}
