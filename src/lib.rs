// =============================================================================
// Market Indicators — normalise a daily price table and enrich it with a
// battery of technical indicators
// =============================================================================
//
//   RawTable --normalize--> PriceSeries --TechnicalIndicators--> EnrichedTable
//
// The enriched table is the only artifact handed downstream.
// =============================================================================

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod table;

pub use catalog::{IndicatorCategory, IndicatorKind};
pub use config::IndicatorConfig;
pub use engine::TechnicalIndicators;
pub use error::{Error, Result};
pub use indicators::Series;
pub use market_data::{normalize, PriceRecord, PriceSeries, RawTable};
pub use table::{EnrichedTable, IndicatorSet, Snapshot};
