use candela_core::{SeriesError, SeriesResult};
use serde::{Deserialize, Serialize};

/// Tunables for [`crate::SeriesGenerator`].
///
/// Missing fields deserialize to the defaults.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// First value of a walk and first open of a candle series.
    pub baseline: f64,
    /// Lowest value a walk or an open may take.
    pub floor: f64,
    /// Width of the uniform step applied to walks and live ticks.
    pub step_range: f64,
    /// Upward bias of each walk step, as a fraction of `step_range`.
    pub drift: f64,
    /// Candle volatility as a fraction of the bar's open.
    pub volatility: f64,
    /// A trend impulse is injected into the next open every this many bars.
    pub trend_interval: usize,
    /// Inclusive lower bound of generated candle volume.
    pub volume_min: u64,
    /// Exclusive upper bound of generated candle volume.
    pub volume_max: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            baseline: 50.0,
            floor: 10.0,
            step_range: 5.0,
            drift: 0.02,
            volatility: 0.15,
            trend_interval: 5,
            volume_min: 2_000,
            volume_max: 22_000,
        }
    }
}

impl GeneratorSettings {
    /// Rejects settings that would produce non-finite or degenerate series.
    pub fn validate(&self) -> SeriesResult<()> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if !positive(self.floor) {
            return Err(SeriesError::InvalidSetting { name: "floor" });
        }
        if !self.baseline.is_finite() || self.baseline < self.floor {
            return Err(SeriesError::InvalidSetting { name: "baseline" });
        }
        if !positive(self.step_range) {
            return Err(SeriesError::InvalidSetting { name: "step_range" });
        }
        if !self.drift.is_finite() || self.drift.abs() >= 0.5 {
            return Err(SeriesError::InvalidSetting { name: "drift" });
        }
        if !positive(self.volatility) {
            return Err(SeriesError::InvalidSetting { name: "volatility" });
        }
        if self.trend_interval == 0 {
            return Err(SeriesError::InvalidSetting {
                name: "trend_interval",
            });
        }
        if self.volume_min >= self.volume_max {
            return Err(SeriesError::InvalidSetting { name: "volume_max" });
        }
        Ok(())
    }
}
