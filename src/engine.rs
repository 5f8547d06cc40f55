// =============================================================================
// Indicator Engine
// =============================================================================
//
// `TechnicalIndicators` wraps an immutable `PriceSeries` and exposes each
// indicator individually with explicit parameters, plus `get_all_indicators`
// which runs the whole battery and merges the results with the price columns.
//
// Within one battery run, intermediate series (SMA, EMA, Money Flow Volume)
// are computed at most once and shared between indicators.  The cache lives
// for a single call only.  A parameter error skips the affected indicator;
// the rest of the battery still runs.
// =============================================================================

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::catalog::IndicatorKind;
use crate::config::IndicatorConfig;
use crate::error::{Error, Result};
use crate::indicators::{
    ad_line, atr, bollinger, cmf, ema, macd, obv, rsi, sma, stochastic, vwap, BollingerSeries,
    MacdSeries, Series, StochasticSeries,
};
use crate::market_data::PriceSeries;
use crate::table::{EnrichedTable, IndicatorFailure, IndicatorSet, RunStats};

pub struct TechnicalIndicators<'a> {
    series: &'a PriceSeries,
    closes: Vec<f64>,
}

impl<'a> TechnicalIndicators<'a> {
    pub fn new(series: &'a PriceSeries) -> Self {
        Self {
            series,
            closes: series.closes(),
        }
    }

    pub fn series(&self) -> &PriceSeries {
        self.series
    }

    // ── Individual indicators ────────────────────────────────────────────

    pub fn moving_average(&self, window: usize) -> Result<Series> {
        sma::calculate_sma(&self.closes, window)
    }

    pub fn exponential_moving_average(&self, window: usize) -> Result<Series> {
        ema::calculate_ema(&self.closes, window)
    }

    pub fn relative_strength_index(&self, window: usize) -> Result<Series> {
        rsi::calculate_rsi(&self.closes, window)
    }

    pub fn macd(&self, short_window: usize, long_window: usize, signal_window: usize) -> Result<MacdSeries> {
        macd::calculate_macd(&self.closes, short_window, long_window, signal_window)
    }

    pub fn bollinger_bands(&self, window: usize, num_std: f64) -> Result<BollingerSeries> {
        bollinger::calculate_bollinger(&self.closes, window, num_std)
    }

    pub fn average_true_range(&self, window: usize) -> Result<Series> {
        atr::calculate_atr(self.series.records(), window)
    }

    pub fn stochastic(&self, window: usize, smooth: usize) -> Result<StochasticSeries> {
        stochastic::calculate_stochastic(self.series.records(), window, smooth)
    }

    pub fn on_balance_volume(&self) -> Series {
        obv::calculate_obv(self.series.records())
    }

    pub fn vwap(&self) -> Series {
        vwap::calculate_vwap(self.series.records())
    }

    pub fn accumulation_distribution(&self) -> Series {
        ad_line::calculate_ad_line(self.series.records())
    }

    pub fn chaikin_money_flow(&self, window: usize) -> Result<Series> {
        cmf::calculate_cmf(self.series.records(), window)
    }

    // ── Full battery ─────────────────────────────────────────────────────

    /// Run every indicator with the standard parameters.
    pub fn get_all_indicators(&self) -> EnrichedTable {
        self.get_all_indicators_with(&IndicatorConfig::default())
    }

    /// Run every indicator with the parameters in `config`.
    pub fn get_all_indicators_with(&self, config: &IndicatorConfig) -> EnrichedTable {
        let mut run = BatteryRun::new(self);
        let mut indicators = IndicatorSet::default();
        let mut failures = Vec::new();

        if !self.series.is_empty() && self.series.volumes().is_none() {
            warn!("price series has no complete volume column; volume indicators will be empty");
        }

        for kind in IndicatorKind::ALL {
            match run.compute(kind, config) {
                Ok(columns) => {
                    debug!(indicator = %kind, columns = columns.len(), "indicator computed");
                    for (name, values) in kind.columns().iter().zip(columns) {
                        indicators.insert(*name, values);
                    }
                }
                Err(error) => {
                    warn!(indicator = %kind, error = %error, "indicator skipped");
                    failures.push(IndicatorFailure {
                        indicator: kind,
                        message: error.to_string(),
                    });
                }
            }
        }

        info!(
            rows = self.series.len(),
            columns = indicators.len(),
            failed = failures.len(),
            computed = run.stats.computed,
            reused = run.stats.reused,
            "indicator battery complete"
        );

        EnrichedTable {
            series: self.series.clone(),
            indicators,
            failures,
            stats: run.stats,
        }
    }
}

// ---------------------------------------------------------------------------
// BatteryRun -- per-call cache of shared intermediates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Intermediate {
    Sma(usize),
    Ema(usize),
}

struct BatteryRun<'e, 'a> {
    engine: &'e TechnicalIndicators<'a>,
    cache: HashMap<Intermediate, Rc<Series>>,
    money_flow: Option<Option<Rc<Vec<f64>>>>,
    stats: RunStats,
}

impl<'e, 'a> BatteryRun<'e, 'a> {
    fn new(engine: &'e TechnicalIndicators<'a>) -> Self {
        Self {
            engine,
            cache: HashMap::new(),
            money_flow: None,
            stats: RunStats::default(),
        }
    }

    fn cached(
        &mut self,
        key: Intermediate,
        compute: impl FnOnce() -> Result<Series>,
    ) -> Result<Rc<Series>> {
        if let Some(hit) = self.cache.get(&key) {
            self.stats.reused += 1;
            return Ok(Rc::clone(hit));
        }
        let value = Rc::new(compute()?);
        self.stats.computed += 1;
        self.cache.insert(key, Rc::clone(&value));
        Ok(value)
    }

    fn sma(&mut self, window: usize) -> Result<Rc<Series>> {
        let engine = self.engine;
        self.cached(Intermediate::Sma(window), || engine.moving_average(window))
    }

    fn ema(&mut self, window: usize) -> Result<Rc<Series>> {
        let engine = self.engine;
        self.cached(Intermediate::Ema(window), || {
            engine.exponential_moving_average(window)
        })
    }

    fn money_flow_volume(&mut self) -> Option<Rc<Vec<f64>>> {
        if let Some(cached) = &self.money_flow {
            self.stats.reused += 1;
            return cached.clone();
        }
        let value = ad_line::money_flow_volume(self.engine.series.records()).map(Rc::new);
        self.stats.computed += 1;
        self.money_flow = Some(value.clone());
        value
    }

    /// Output columns of `kind`, in the order of `kind.columns()`.
    fn compute(&mut self, kind: IndicatorKind, cfg: &IndicatorConfig) -> Result<Vec<Series>> {
        let engine = self.engine;
        let records = engine.series.records();

        let columns = match kind {
            IndicatorKind::MovingAverage => {
                require_window("sma_window", cfg.sma_window)?;
                vec![self.sma(cfg.sma_window)?.as_ref().clone()]
            }
            IndicatorKind::ExponentialMovingAverage => {
                require_window("ema_window", cfg.ema_window)?;
                vec![self.ema(cfg.ema_window)?.as_ref().clone()]
            }
            IndicatorKind::RelativeStrengthIndex => {
                require_window("rsi_window", cfg.rsi_window)?;
                vec![engine.relative_strength_index(cfg.rsi_window)?]
            }
            IndicatorKind::Macd => {
                require_window("macd_short", cfg.macd_short)?;
                require_window("macd_long", cfg.macd_long)?;
                require_window("macd_signal", cfg.macd_signal)?;
                let short = self.ema(cfg.macd_short)?;
                let long = self.ema(cfg.macd_long)?;
                let m = macd::macd_from_emas(&short, &long, cfg.macd_signal)?;
                vec![m.macd, m.signal, m.histogram]
            }
            IndicatorKind::BollingerBands => {
                require_window("bollinger_window", cfg.bollinger_window)?;
                if !cfg.bollinger_num_std.is_finite() || cfg.bollinger_num_std < 0.0 {
                    return Err(Error::invalid("bollinger_num_std", cfg.bollinger_num_std));
                }
                let middle = self.sma(cfg.bollinger_window)?;
                let std_dev = bollinger::rolling_std(&engine.closes, cfg.bollinger_window)?;
                let bands = bollinger::bands_from_parts(
                    middle.as_ref().clone(),
                    &std_dev,
                    cfg.bollinger_num_std,
                )?;
                vec![bands.upper, bands.lower, bands.middle]
            }
            IndicatorKind::AverageTrueRange => {
                require_window("atr_window", cfg.atr_window)?;
                vec![engine.average_true_range(cfg.atr_window)?]
            }
            IndicatorKind::Stochastic => {
                require_window("stochastic_window", cfg.stochastic_window)?;
                require_window("stochastic_smooth", cfg.stochastic_smooth)?;
                let s = engine.stochastic(cfg.stochastic_window, cfg.stochastic_smooth)?;
                vec![s.k, s.d]
            }
            IndicatorKind::OnBalanceVolume => vec![engine.on_balance_volume()],
            IndicatorKind::Vwap => vec![engine.vwap()],
            IndicatorKind::AccumulationDistribution => {
                let mfv = self.money_flow_volume();
                vec![ad_line::ad_line_from_money_flow(mfv.as_deref().map(Vec::as_slice), records.len())]
            }
            IndicatorKind::ChaikinMoneyFlow => {
                require_window("cmf_window", cfg.cmf_window)?;
                let mfv = self.money_flow_volume();
                let values = match (mfv, engine.series.volumes()) {
                    (Some(mfv), Some(volumes)) => cmf::cmf_from_money_flow(&mfv, &volumes, cfg.cmf_window)?,
                    _ => vec![None; records.len()],
                };
                vec![values]
            }
        };

        debug_assert_eq!(columns.len(), kind.columns().len());
        Ok(columns)
    }
}

/// Config-level window check, so failures name the config field.
fn require_window(name: &'static str, window: usize) -> Result<()> {
    if window == 0 {
        return Err(Error::invalid(name, window));
    }
    Ok(())
}
