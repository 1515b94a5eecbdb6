use serde::{Deserialize, Serialize};

/// Behaviour shared by every point kind that can live inside a [`crate::Series`].
pub trait SeriesPoint {
    /// Unix timestamp in seconds.
    fn time(&self) -> i64;

    /// Returns false when the point carries non-finite numbers or breaks its own invariants.
    fn is_well_formed(&self) -> bool {
        true
    }
}

/// One sample of a scalar time series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// Unix timestamp in seconds.
    pub time: i64,
    /// Sample value.
    pub value: f64,
}

impl TimePoint {
    /// Builds a point.
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

impl SeriesPoint for TimePoint {
    fn time(&self) -> i64 {
        self.time
    }

    fn is_well_formed(&self) -> bool {
        self.value.is_finite()
    }
}

/// Open/high/low/close bar with traded volume.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OhlcPoint {
    /// Unix timestamp of the bar's open, in seconds.
    pub time: i64,
    /// First traded price.
    pub open: f64,
    /// Highest price; at least `max(open, close)`.
    pub high: f64,
    /// Lowest price; at most `min(open, close)`.
    pub low: f64,
    /// Last traded price.
    pub close: f64,
    /// Traded volume.
    pub volume: u64,
}

impl OhlcPoint {
    /// Size of the candle body, independent of direction.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Full high-to-low span of the bar.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Classifies the bar by comparing its close with its open.
    pub fn direction(&self) -> Direction {
        Direction::between(self.open, self.close)
    }
}

impl SeriesPoint for OhlcPoint {
    fn time(&self) -> i64 {
        self.time
    }

    fn is_well_formed(&self) -> bool {
        let finite = [self.open, self.high, self.low, self.close]
            .iter()
            .all(|value| value.is_finite());
        finite && self.low <= self.open.min(self.close) && self.high >= self.open.max(self.close)
    }
}

/// Output sample of an indicator.
///
/// `value` is `None` wherever the indicator lacks enough history, which keeps
/// the output positionally aligned with its input. Serializes to `null`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    /// Timestamp copied from the input point at the same position.
    pub time: i64,
    /// Indicator value, or `None` during warm-up.
    pub value: Option<f64>,
}

impl IndicatorPoint {
    /// Builds a point, defined or not.
    pub fn new(time: i64, value: Option<f64>) -> Self {
        Self { time, value }
    }

    /// Placeholder for a position the indicator cannot compute yet.
    pub fn empty(time: i64) -> Self {
        Self { time, value: None }
    }

    /// True when the indicator produced a value here.
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }
}

impl SeriesPoint for IndicatorPoint {
    fn time(&self) -> i64 {
        self.time
    }

    fn is_well_formed(&self) -> bool {
        self.value.map_or(true, f64::is_finite)
    }
}

/// Movement of a series relative to its previous sample.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Higher than the previous sample.
    Up,
    /// Lower than the previous sample.
    Down,
    /// Unchanged, or no previous sample.
    Neutral,
}

impl Direction {
    /// Direction of travel from `previous` to `current`.
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Self::Up
        } else if current < previous {
            Self::Down
        } else {
            Self::Neutral
        }
    }
}

/// Volume histogram bar tagged with the price direction at the same time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeBar {
    /// Unix timestamp in seconds.
    pub time: i64,
    /// Traded volume.
    pub volume: u64,
    /// Price move at this time, used to colour the bar.
    pub direction: Direction,
}

impl SeriesPoint for VolumeBar {
    fn time(&self) -> i64 {
        self.time
    }
}
