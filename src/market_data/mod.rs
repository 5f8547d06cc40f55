pub mod normalizer;
pub mod price_series;

// Re-export the core types for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use normalizer::{normalize, RawTable};
pub use price_series::{PriceRecord, PriceSeries};
