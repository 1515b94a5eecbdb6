use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use candela_config::{load_config, AppConfig};
use candela_core::format::{
    format_currency, format_percent, format_volume, BandedFormat, PriceFormat,
};
use candela_core::{Series, SeriesPoint};
use candela_data::SeriesGenerator;
use candela_indicators::{bollinger_bands, ema, macd, rsi, sma, Input};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::telemetry::init_tracing;

#[derive(Parser)]
#[command(author, version, about = "Synthetic market series and technical indicators")]
pub struct Cli {
    /// Configuration environment name (loads config/{env}.toml on top of default.toml)
    #[arg(long, global = true)]
    env: Option<String>,
    /// Directory holding the TOML configuration files
    #[arg(long, global = true, default_value = "config")]
    config_dir: PathBuf,
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a synthetic series
    Generate(GenerateArgs),
    /// Run indicators over a generated series
    Indicators(IndicatorArgs),
    /// Format a number for display
    Format(FormatArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
pub struct SeriesArgs {
    /// Number of daily points
    #[arg(long, default_value_t = 100)]
    count: usize,
    /// Seed for reproducible output; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Date of the last point (YYYY-MM-DD); defaults to today (UTC)
    #[arg(long)]
    start: Option<NaiveDate>,
}

impl SeriesArgs {
    fn start_date(&self) -> NaiveDate {
        self.start.unwrap_or_else(|| Utc::now().date_naive())
    }
}

#[derive(Args)]
pub struct GenerateArgs {
    #[arg(long, value_enum, default_value_t = GenerateKind::Walk)]
    kind: GenerateKind,
    #[command(flatten)]
    series: SeriesArgs,
    /// Append this many live points after the walk
    #[arg(long, default_value_t = 0)]
    extend: usize,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum GenerateKind {
    Walk,
    Ohlc,
    Bundle,
    Volume,
}

#[derive(Args)]
pub struct IndicatorArgs {
    #[arg(long, value_enum, default_value_t = IndicatorKind::All)]
    kind: IndicatorKind,
    /// Input series shape
    #[arg(long, value_enum, default_value_t = SourceKind::Walk)]
    source: SourceKind,
    /// Overrides the configured period of sma, ema, rsi or bollinger
    #[arg(long)]
    period: Option<usize>,
    #[command(flatten)]
    series: SeriesArgs,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    Bollinger,
    All,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum SourceKind {
    Walk,
    Ohlc,
}

#[derive(Args)]
pub struct FormatArgs {
    #[arg(long, value_enum, default_value_t = FormatKind::Price)]
    kind: FormatKind,
    /// Number to format
    #[arg(allow_negative_numbers = true)]
    value: f64,
    #[arg(long, default_value_t = 2)]
    precision: u32,
    /// Currency symbol prefix
    #[arg(long, default_value = "$")]
    symbol: String,
    /// Price tick the value snaps to
    #[arg(long, default_value_t = 0.01)]
    min_move: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum FormatKind {
    Price,
    Currency,
    Percent,
    Volume,
    Banded,
}

/// Parses the command line, loads configuration and dispatches.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config_dir, cli.env.as_deref())?;
    init_tracing(
        &config.telemetry.log_level,
        cli.log_json || config.telemetry.json,
    )?;
    debug!(
        config_dir = %cli.config_dir.display(),
        env = cli.env.as_deref().unwrap_or("default"),
        "configuration loaded"
    );

    match cli.command {
        Commands::Generate(args) => args.run(&config),
        Commands::Indicators(args) => args.run(&config),
        Commands::Format(args) => args.run(),
        Commands::Config => {
            let rendered = config.to_toml()?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            Ok(())
        }
    }
}

impl GenerateArgs {
    fn run(&self, config: &AppConfig) -> Result<()> {
        let mut generator = SeriesGenerator::new(config.generator.clone(), self.series.seed)?;
        let count = self.series.count;
        let start = self.series.start_date();
        info!(kind = ?self.kind, count, %start, "generating series");

        let output = match self.kind {
            GenerateKind::Walk => {
                let mut series = generator.random_walk(count, start)?;
                for _ in 0..self.extend {
                    let Some(point) = generator.next_point(&series) else {
                        break;
                    };
                    series.push(point)?;
                }
                serde_json::to_value(&series)?
            }
            GenerateKind::Ohlc => serde_json::to_value(generator.ohlc(count, start)?)?,
            GenerateKind::Bundle => serde_json::to_value(generator.line_bundle(count, start)?)?,
            GenerateKind::Volume => {
                let series = generator.random_walk(count, start)?;
                let volume = generator.volume_histogram(&series);
                json!({ "series": series, "volume": volume })
            }
        };
        print_json(&output)
    }
}

impl IndicatorArgs {
    fn run(&self, config: &AppConfig) -> Result<()> {
        let mut generator = SeriesGenerator::new(config.generator.clone(), self.series.seed)?;
        let count = self.series.count;
        let start = self.series.start_date();
        let output = match self.source {
            SourceKind::Walk => self.compute(&generator.random_walk(count, start)?, config)?,
            SourceKind::Ohlc => self.compute(&generator.ohlc(count, start)?, config)?,
        };
        print_json(&output)
    }

    fn compute<P>(&self, series: &Series<P>, config: &AppConfig) -> Result<Value>
    where
        P: SeriesPoint + Input + Serialize,
    {
        let settings = &config.indicators;
        let wants = |kind: IndicatorKind| self.kind == kind || self.kind == IndicatorKind::All;
        let mut indicators = BTreeMap::new();

        if wants(IndicatorKind::Sma) {
            let periods = match self.period {
                Some(period) => vec![period],
                None => settings.sma_periods.clone(),
            };
            for period in periods {
                let line = sma(series, period).context("failed to compute SMA")?;
                indicators.insert(format!("sma_{period}"), serde_json::to_value(line)?);
            }
        }
        if wants(IndicatorKind::Ema) {
            let period = self.period.unwrap_or(settings.ema_period);
            let line = ema(series, period).context("failed to compute EMA")?;
            indicators.insert(format!("ema_{period}"), serde_json::to_value(line)?);
        }
        if wants(IndicatorKind::Rsi) {
            let period = self.period.unwrap_or(settings.rsi.period);
            let line = rsi(series, period).context("failed to compute RSI")?;
            indicators.insert(
                "rsi".to_string(),
                json!({
                    "period": period,
                    "overbought": settings.rsi.overbought,
                    "oversold": settings.rsi.oversold,
                    "series": line,
                }),
            );
        }
        if wants(IndicatorKind::Macd) {
            let params = &settings.macd;
            let lines = macd(
                series,
                params.fast_period,
                params.slow_period,
                params.signal_period,
            )
            .context("failed to compute MACD")?;
            indicators.insert("macd".to_string(), serde_json::to_value(lines)?);
        }
        if wants(IndicatorKind::Bollinger) {
            let period = self.period.unwrap_or(settings.bollinger.period);
            let bands = bollinger_bands(series, period, settings.bollinger.multiplier)
                .context("failed to compute Bollinger bands")?;
            indicators.insert("bollinger".to_string(), serde_json::to_value(bands)?);
        }

        info!(
            kind = ?self.kind,
            len = series.len(),
            outputs = indicators.len(),
            "indicators computed"
        );
        Ok(json!({ "input": series, "indicators": indicators }))
    }
}

impl FormatArgs {
    fn run(&self) -> Result<()> {
        let formatted = match self.kind {
            FormatKind::Price => PriceFormat::new(self.precision, self.min_move)?.format(self.value),
            FormatKind::Currency => format_currency(self.value, &self.symbol, self.precision),
            FormatKind::Percent => format_percent(self.value, self.precision),
            FormatKind::Volume => format_volume(self.value),
            FormatKind::Banded => BandedFormat::default().format(self.value),
        };
        print_json(&json!({ "value": self.value, "formatted": formatted }))
    }
}

fn print_json(value: &Value) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
