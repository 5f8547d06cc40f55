// =============================================================================
// Indicator Configuration — parameters for the full battery
// =============================================================================
//
// Every window and multiplier used by `get_all_indicators` lives here.  All
// fields carry `#[serde(default = "...")]` so that a partial (or empty) config
// file falls back to the standard parameters.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Error;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_sma_window() -> usize {
    20
}

fn default_ema_window() -> usize {
    20
}

fn default_rsi_window() -> usize {
    14
}

fn default_macd_short() -> usize {
    12
}

fn default_macd_long() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_bollinger_window() -> usize {
    20
}

fn default_bollinger_num_std() -> f64 {
    2.0
}

fn default_atr_window() -> usize {
    14
}

fn default_cmf_window() -> usize {
    20
}

fn default_stochastic_window() -> usize {
    14
}

fn default_stochastic_smooth() -> usize {
    3
}

// =============================================================================
// IndicatorConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    #[serde(default = "default_sma_window")]
    pub sma_window: usize,

    #[serde(default = "default_ema_window")]
    pub ema_window: usize,

    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,

    #[serde(default = "default_macd_short")]
    pub macd_short: usize,

    #[serde(default = "default_macd_long")]
    pub macd_long: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_bollinger_window")]
    pub bollinger_window: usize,

    /// Band distance in sample standard deviations.
    #[serde(default = "default_bollinger_num_std")]
    pub bollinger_num_std: f64,

    /// ATR is the simple average of True Range over this many bars.
    #[serde(default = "default_atr_window")]
    pub atr_window: usize,

    #[serde(default = "default_cmf_window")]
    pub cmf_window: usize,

    #[serde(default = "default_stochastic_window")]
    pub stochastic_window: usize,

    /// %D smoothing of %K.
    #[serde(default = "default_stochastic_smooth")]
    pub stochastic_smooth: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_window: default_sma_window(),
            ema_window: default_ema_window(),
            rsi_window: default_rsi_window(),
            macd_short: default_macd_short(),
            macd_long: default_macd_long(),
            macd_signal: default_macd_signal(),
            bollinger_window: default_bollinger_window(),
            bollinger_num_std: default_bollinger_num_std(),
            atr_window: default_atr_window(),
            cmf_window: default_cmf_window(),
            stochastic_window: default_stochastic_window(),
            stochastic_smooth: default_stochastic_smooth(),
        }
    }
}

impl IndicatorConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read indicator config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse indicator config from {}", path.display()))?;
        info!(
            path = %path.display(),
            sma_window = config.sma_window,
            rsi_window = config.rsi_window,
            "indicator config loaded"
        );
        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise indicator config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "indicator config saved (atomic)");
        Ok(())
    }

    /// Report the first invalid parameter.  Windows must be at least 1 and the
    /// Bollinger multiplier finite and non-negative.
    pub fn validate(&self) -> std::result::Result<(), Error> {
        let windows = [
            ("sma_window", self.sma_window),
            ("ema_window", self.ema_window),
            ("rsi_window", self.rsi_window),
            ("macd_short", self.macd_short),
            ("macd_long", self.macd_long),
            ("macd_signal", self.macd_signal),
            ("bollinger_window", self.bollinger_window),
            ("atr_window", self.atr_window),
            ("cmf_window", self.cmf_window),
            ("stochastic_window", self.stochastic_window),
            ("stochastic_smooth", self.stochastic_smooth),
        ];
        if let Some((name, value)) = windows.into_iter().find(|(_, w)| *w == 0) {
            return Err(Error::invalid(name, value));
        }
        if !self.bollinger_num_std.is_finite() || self.bollinger_num_std < 0.0 {
            return Err(Error::invalid("bollinger_num_std", self.bollinger_num_std));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_standard_parameters() {
        let cfg = IndicatorConfig::default();
        assert_eq!(cfg.sma_window, 20);
        assert_eq!(cfg.ema_window, 20);
        assert_eq!(cfg.rsi_window, 14);
        assert_eq!((cfg.macd_short, cfg.macd_long, cfg.macd_signal), (12, 26, 9));
        assert_eq!(cfg.bollinger_window, 20);
        assert!((cfg.bollinger_num_std - 2.0).abs() < f64::EPSILON);
        assert_eq!(cfg.atr_window, 14);
        assert_eq!(cfg.cmf_window, 20);
        assert_eq!((cfg.stochastic_window, cfg.stochastic_smooth), (14, 3));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: IndicatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, IndicatorConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "rsi_window": 7, "bollinger_num_std": 2.5 }"#;
        let cfg: IndicatorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.rsi_window, 7);
        assert!((cfg.bollinger_num_std - 2.5).abs() < f64::EPSILON);
        assert_eq!(cfg.sma_window, 20);
        assert_eq!(cfg.macd_long, 26);
    }

    #[test]
    fn validate_reports_first_bad_window() {
        let cfg = IndicatorConfig {
            rsi_window: 0,
            cmf_window: 0,
            ..IndicatorConfig::default()
        };
        match cfg.validate() {
            Err(Error::InvalidParameter { name, .. }) => assert_eq!(name, "rsi_window"),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }

        let cfg = IndicatorConfig {
            bollinger_num_std: -1.0,
            ..IndicatorConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "indicator_config_{}.json",
            std::process::id()
        ));
        let cfg = IndicatorConfig {
            sma_window: 50,
            ..IndicatorConfig::default()
        };
        cfg.save(&path).unwrap();
        let loaded = IndicatorConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_is_error() {
        assert!(IndicatorConfig::load("/nonexistent/indicator_config.json").is_err());
    }
}
