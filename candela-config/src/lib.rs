//! Typed, layered configuration for Candela hosts.

use std::path::Path;

use anyhow::{bail, Context, Result};
use candela_data::GeneratorSettings;
use candela_indicators::indicators::{bollinger, macd, rsi};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides, e.g. `CANDELA__GENERATOR__FLOOR=5`.
pub const ENV_PREFIX: &str = "CANDELA";

/// Root configuration consumed by the CLI host.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorSettings,
    pub indicators: IndicatorSettings,
    pub telemetry: TelemetryConfig,
}

/// Default parameters for each indicator.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorSettings {
    /// Moving-average overlays; the demo charts draw MA5 and MA20.
    pub sma_periods: Vec<usize>,
    pub ema_period: usize,
    pub rsi: RsiSettings,
    pub macd: MacdSettings,
    pub bollinger: BollingerSettings,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            sma_periods: vec![5, 20],
            ema_period: macd::DEFAULT_FAST_PERIOD,
            rsi: RsiSettings::default(),
            macd: MacdSettings::default(),
            bollinger: BollingerSettings::default(),
        }
    }
}

/// RSI period plus the guide levels drawn alongside it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RsiSettings {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiSettings {
    fn default() -> Self {
        Self {
            period: rsi::DEFAULT_PERIOD,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MacdSettings {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdSettings {
    fn default() -> Self {
        Self {
            fast_period: macd::DEFAULT_FAST_PERIOD,
            slow_period: macd::DEFAULT_SLOW_PERIOD,
            signal_period: macd::DEFAULT_SIGNAL_PERIOD,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BollingerSettings {
    pub period: usize,
    pub multiplier: f64,
}

impl Default for BollingerSettings {
    fn default() -> Self {
        Self {
            period: bollinger::DEFAULT_PERIOD,
            multiplier: bollinger::DEFAULT_MULTIPLIER,
        }
    }
}

/// Logging options applied by the host's tracing subscriber.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON lines instead of human-readable logs.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Rejects settings the generator or indicators would refuse at call time.
    pub fn validate(&self) -> Result<()> {
        self.generator
            .validate()
            .context("invalid [generator] settings")?;

        let indicators = &self.indicators;
        if indicators.sma_periods.iter().any(|period| *period == 0) {
            bail!("indicators.sma_periods entries must be at least 1");
        }
        let periods = [
            ("indicators.ema_period", indicators.ema_period),
            ("indicators.rsi.period", indicators.rsi.period),
            ("indicators.macd.fast_period", indicators.macd.fast_period),
            ("indicators.macd.slow_period", indicators.macd.slow_period),
            ("indicators.macd.signal_period", indicators.macd.signal_period),
            ("indicators.bollinger.period", indicators.bollinger.period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            bail!("{name} must be at least 1");
        }
        let multiplier = indicators.bollinger.multiplier;
        if !multiplier.is_finite() || multiplier < 0.0 {
            bail!("indicators.bollinger.multiplier must be a non-negative number");
        }
        let rsi = &indicators.rsi;
        if !(0.0..=100.0).contains(&rsi.oversold)
            || !(0.0..=100.0).contains(&rsi.overbought)
            || rsi.oversold >= rsi.overbought
        {
            bail!("indicators.rsi levels must satisfy 0 <= oversold < overbought <= 100");
        }
        Ok(())
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration")
    }
}

/// Loads `default.toml`, then `{env}.toml`, from `dir`, then `CANDELA__*`
/// environment overrides. Missing files are skipped.
pub fn load_config(dir: impl AsRef<Path>, env: Option<&str>) -> Result<AppConfig> {
    let dir = dir.as_ref();
    let mut builder = Config::builder()
        .add_source(File::from(dir.join("default.toml")).required(false));
    if let Some(env) = env {
        builder = builder.add_source(File::from(dir.join(format!("{env}.toml"))).required(false));
    }
    let settings = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("failed to load configuration from {}", dir.display()))?;

    let config: AppConfig = settings
        .try_deserialize()
        .context("configuration has an unexpected shape")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn defaults_validate() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.indicators.rsi.period, 14);
        assert_eq!(config.indicators.macd.slow_period, 26);
        assert_eq!(config.indicators.bollinger.multiplier, 2.0);
        assert_eq!(config.indicators.sma_periods, vec![5, 20]);
    }

    #[test]
    fn environment_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[indicators.rsi]\nperiod = 10\n\n[generator]\nfloor = 5.0\n",
        )
        .unwrap();
        fs::write(dir.path().join("demo.toml"), "[indicators.rsi]\nperiod = 7\n").unwrap();

        let config = load_config(dir.path(), Some("demo")).unwrap();
        assert_eq!(config.indicators.rsi.period, 7);
        assert_eq!(config.generator.floor, 5.0);
        assert_eq!(config.generator.baseline, 50.0);
    }

    #[test]
    fn missing_directory_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent"), None).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn rejects_zero_periods() {
        let mut config = AppConfig::default();
        config.indicators.macd.signal_period = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("indicators.macd.signal_period"));
    }

    #[test]
    fn rejects_invalid_file_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[generator]\nvolatility = -1.0\n").unwrap();
        assert!(load_config(dir.path(), None).is_err());
    }

    #[test]
    fn renders_as_toml() {
        let rendered = AppConfig::default().to_toml().unwrap();
        assert!(rendered.contains("[indicators.rsi]"));
        assert!(rendered.contains("period = 14"));
    }
}
