// =============================================================================
// Market Indicators — command-line entry point
// =============================================================================
//
//   market-indicators <input.csv> [output|-]
//
// Environment (a `.env` file is honoured):
//   MI_INPUT   input CSV when no positional argument is given
//   MI_OUTPUT  output path; `-` or unset writes to stdout
//   MI_FORMAT  `csv` (default) or `json`
//   MI_CONFIG  indicator config JSON (default `indicator_config.json`)
//   RUST_LOG   log filter (default `info`); logs go to stderr
// =============================================================================

use std::io::Write;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use market_indicators::{normalize, EnrichedTable, IndicatorConfig, RawTable, TechnicalIndicators};

const DEFAULT_CONFIG_PATH: &str = "indicator_config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => bail!("unknown output format {other:?} (expected csv or json)"),
        }
    }
}

fn main() -> Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let input = args
        .first()
        .cloned()
        .or_else(|| std::env::var("MI_INPUT").ok())
        .context("usage: market-indicators <input.csv> [output|-] (or set MI_INPUT)")?;
    let output = args
        .get(1)
        .cloned()
        .or_else(|| std::env::var("MI_OUTPUT").ok())
        .filter(|p| p != "-");
    let format: OutputFormat = std::env::var("MI_FORMAT")
        .unwrap_or_else(|_| "csv".to_string())
        .parse()?;

    // ── 2. Config ────────────────────────────────────────────────────────
    let config_path =
        std::env::var("MI_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = IndicatorConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        IndicatorConfig::default()
    });
    if let Err(e) = config.validate() {
        warn!(error = %e, "Config has an invalid parameter; that indicator will be skipped");
    }

    // ── 3. Normalise ─────────────────────────────────────────────────────
    let raw = RawTable::from_csv_path(&input)
        .with_context(|| format!("failed to read price table from {input}"))?;
    let series = normalize(&raw).with_context(|| format!("failed to normalise {input}"))?;
    info!(input = %input, rows = series.len(), "price table loaded");

    // ── 4. Indicators ────────────────────────────────────────────────────
    let enriched = TechnicalIndicators::new(&series).get_all_indicators_with(&config);
    for failure in &enriched.failures {
        warn!(indicator = %failure.indicator, reason = %failure.message, "Indicator not computed");
    }

    // ── 5. Output ────────────────────────────────────────────────────────
    match &output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create output file {path}"))?;
            write_table(&enriched, format, std::io::BufWriter::new(file))?;
            info!(output = %path, ?format, "enriched table written");
        }
        None => write_table(&enriched, format, std::io::stdout().lock())?,
    }

    if let Some(latest) = enriched.latest() {
        info!(
            date = %latest.date,
            close = latest.close,
            rsi = ?latest.rsi_label,
            stochastic = ?latest.stochastic_label,
            "Latest bar"
        );
    }

    Ok(())
}

fn write_table(table: &EnrichedTable, format: OutputFormat, mut out: impl Write) -> Result<()> {
    match format {
        OutputFormat::Csv => table.write_csv(&mut out).context("failed to write CSV")?,
        OutputFormat::Json => {
            let json = table.to_json_pretty().context("failed to serialise JSON")?;
            writeln!(out, "{json}").context("failed to write JSON")?;
        }
    }
    out.flush().context("failed to flush output")?;
    Ok(())
}
