//! Seeded random walks and OHLCV candles.

use candela_core::{
    Direction, OhlcPoint, Series, SeriesError, SeriesResult, TimePoint, VolumeBar,
    SECONDS_PER_DAY,
};
use chrono::{NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::settings::GeneratorSettings;

/// Candle body as a fraction of volatility: `[BODY_MIN, BODY_MIN + BODY_SPAN)`.
const BODY_MIN: f64 = 0.5;
const BODY_SPAN: f64 = 0.5;
/// Wick length beyond the body, as a fraction of volatility.
const WICK_MIN: f64 = 0.8;
const WICK_SPAN: f64 = 1.2;
/// Smallest high-to-low span, as a multiple of volatility.
const MIN_RANGE: f64 = 3.0;
/// Smallest body, as a multiple of volatility.
const MIN_BODY: f64 = 0.6;
/// Volume range of the histogram attached to a line series.
const LINE_VOLUME: std::ops::Range<u64> = 1_000..11_000;

/// Three aligned line series derived from one walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBundle {
    /// The underlying random walk.
    pub primary: Series<TimePoint>,
    /// Walk scaled per point by a factor in `[0.8, 1.2)`.
    pub secondary: Series<TimePoint>,
    /// Walk scaled per point by a factor in `[0.6, 1.0)`.
    pub tertiary: Series<TimePoint>,
}

/// Produces synthetic daily series from a seedable random source.
#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    settings: GeneratorSettings,
    rng: StdRng,
}

impl SeriesGenerator {
    /// Creates a generator; with `seed` set, output is reproducible.
    pub fn new(settings: GeneratorSettings, seed: Option<u64>) -> SeriesResult<Self> {
        settings.validate()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { settings, rng })
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Daily random walk of `count` points ending on `start_date`.
    ///
    /// Each step adds `(u - (0.5 - drift)) * step_range` and floors the value.
    pub fn random_walk(
        &mut self,
        count: usize,
        start_date: NaiveDate,
    ) -> SeriesResult<Series<TimePoint>> {
        let times = daily_axis(count, start_date)?;
        let center = 0.5 - self.settings.drift;
        let mut value = self.settings.baseline;
        let mut points = Vec::with_capacity(count);
        for time in times {
            let change = (self.rng.gen::<f64>() - center) * self.settings.step_range;
            value = (value + change).max(self.settings.floor);
            points.push(TimePoint::new(time, value));
        }
        debug!(kind = "walk", count, "generated series");
        Ok(Series::new_unchecked(points))
    }

    /// Daily OHLCV candles ending on `start_date`.
    ///
    /// Bars satisfy `low <= min(open, close)` and `high >= max(open, close)` as
    /// built; each open follows the previous close.
    pub fn ohlc(
        &mut self,
        count: usize,
        start_date: NaiveDate,
    ) -> SeriesResult<Series<OhlcPoint>> {
        let times = daily_axis(count, start_date)?;
        let mut open = self.settings.baseline;
        let mut points = Vec::with_capacity(count);
        for (index, time) in times.enumerate() {
            let bar = self.candle(time, open);
            // Counting bars left until `start_date`, so the last bar is always a trend bar.
            let remaining = count - 1 - index;
            let volatility = open * self.settings.volatility;
            let trend = if remaining % self.settings.trend_interval == 0 {
                (self.rng.gen::<f64>() - 0.5) * volatility * 2.0
            } else {
                0.0
            };
            let noise = (self.rng.gen::<f64>() - 0.5) * volatility * 0.5;
            open = (bar.close + trend + noise).max(self.settings.floor);
            points.push(bar);
        }
        debug!(kind = "ohlc", count, "generated series");
        Ok(Series::new_unchecked(points))
    }

    fn candle(&mut self, time: i64, open: f64) -> OhlcPoint {
        let volatility = open * self.settings.volatility;
        let is_up = self.rng.gen_bool(0.5);
        let body = (BODY_MIN + self.rng.gen::<f64>() * BODY_SPAN) * volatility;
        let mut close = if is_up { open + body } else { open - body };

        let upper_wick = (WICK_MIN + self.rng.gen::<f64>() * WICK_SPAN) * volatility;
        let lower_wick = (WICK_MIN + self.rng.gen::<f64>() * WICK_SPAN) * volatility;
        let mut high = open.max(close) + upper_wick;
        let mut low = open.min(close) - lower_wick;

        let range = high - low;
        if range < volatility * MIN_RANGE {
            let extension = (volatility * MIN_RANGE - range) / 2.0;
            high += extension;
            low -= extension;
        }

        if (close - open).abs() < volatility * MIN_BODY {
            let gap = volatility * MIN_BODY;
            if is_up {
                close = open + gap;
                high = high.max(close + volatility * WICK_MIN);
            } else {
                close = open - gap;
                low = low.min(close - volatility * WICK_MIN);
            }
        }

        let (high, low) = cover_body(open, close, high, low);
        OhlcPoint {
            time,
            open,
            high,
            low,
            close,
            volume: self
                .rng
                .gen_range(self.settings.volume_min..self.settings.volume_max),
        }
    }

    /// A base walk plus two randomly rescaled copies on the same time axis.
    pub fn line_bundle(
        &mut self,
        count: usize,
        start_date: NaiveDate,
    ) -> SeriesResult<LineBundle> {
        let primary = self.random_walk(count, start_date)?;
        let secondary = self.rescale(&primary, 0.8, 0.4);
        let tertiary = self.rescale(&primary, 0.6, 0.4);
        Ok(LineBundle {
            primary,
            secondary,
            tertiary,
        })
    }

    fn rescale(&mut self, base: &Series<TimePoint>, min: f64, span: f64) -> Series<TimePoint> {
        let points = base
            .iter()
            .map(|p| TimePoint::new(p.time, p.value * (min + self.rng.gen::<f64>() * span)))
            .collect();
        Series::new_unchecked(points)
    }

    /// One volume bar per point, tagged with the move from the previous point.
    pub fn volume_histogram(&mut self, series: &Series<TimePoint>) -> Series<VolumeBar> {
        let mut previous: Option<f64> = None;
        let bars = series
            .iter()
            .map(|point| {
                let direction = previous
                    .map(|prev| Direction::between(prev, point.value))
                    .unwrap_or(Direction::Neutral);
                previous = Some(point.value);
                VolumeBar {
                    time: point.time,
                    volume: self.rng.gen_range(LINE_VOLUME),
                    direction,
                }
            })
            .collect();
        Series::new_unchecked(bars)
    }

    /// The point a live feed would append next: one day later, one walk step away.
    pub fn next_point(&mut self, series: &Series<TimePoint>) -> Option<TimePoint> {
        let last = series.last()?;
        let time = last.time.checked_add(SECONDS_PER_DAY)?;
        let change = (self.rng.gen::<f64>() - 0.5) * self.settings.step_range;
        Some(TimePoint::new(time, (last.value + change).max(self.settings.floor)))
    }
}

/// Random walk with default settings; see [`SeriesGenerator::random_walk`].
pub fn generate_random_walk(
    count: usize,
    start_date: NaiveDate,
    seed: Option<u64>,
) -> SeriesResult<Series<TimePoint>> {
    SeriesGenerator::new(GeneratorSettings::default(), seed)?.random_walk(count, start_date)
}

/// Candles with default settings; see [`SeriesGenerator::ohlc`].
pub fn generate_ohlc(
    count: usize,
    start_date: NaiveDate,
    seed: Option<u64>,
) -> SeriesResult<Series<OhlcPoint>> {
    SeriesGenerator::new(GeneratorSettings::default(), seed)?.ohlc(count, start_date)
}

/// Midnight-UTC timestamps for `count` consecutive days ending on `start_date`.
fn daily_axis(count: usize, start_date: NaiveDate) -> SeriesResult<impl Iterator<Item = i64>> {
    if count == 0 {
        return Err(SeriesError::ZeroCount { name: "count" });
    }
    let end = start_date.and_time(NaiveTime::MIN).and_utc().timestamp();
    let first = i64::try_from(count - 1)
        .ok()
        .and_then(|days| days.checked_mul(SECONDS_PER_DAY))
        .and_then(|span| end.checked_sub(span))
        .ok_or(SeriesError::TimeOverflow { count, start: end })?;
    Ok((0..count as i64).map(move |day| first + day * SECONDS_PER_DAY))
}

/// Widens the wicks symmetrically until they enclose the body.
fn cover_body(open: f64, close: f64, mut high: f64, mut low: f64) -> (f64, f64) {
    let top = open.max(close);
    if high < top {
        let shortfall = top - high;
        high += shortfall;
        low -= shortfall;
    }
    let bottom = open.min(close);
    if low > bottom {
        let shortfall = low - bottom;
        low -= shortfall;
        high += shortfall;
    }
    (high, low)
}
