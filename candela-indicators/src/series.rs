//! Batch indicator functions.
//!
//! Every function maps a whole [`Series`] to output series of the same length
//! and time axis. Positions without enough history hold `None`. Parameters
//! are validated before any work starts; short input is never an error.

use candela_core::{IndicatorPoint, Series, SeriesPoint, TimePoint};
use serde::Serialize;
use tracing::debug;

use crate::core::{ensure_period, Indicator, IndicatorResult, Input};
use crate::indicators::{BollingerBands, Ema, Rsi, Sma};

/// MACD output lines sharing the input's time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    /// Fast EMA minus slow EMA.
    pub macd_line: Series<IndicatorPoint>,
    /// EMA of the defined MACD values, realigned by time.
    pub signal_line: Series<IndicatorPoint>,
    /// MACD line minus signal line.
    pub histogram: Series<IndicatorPoint>,
}

/// Bollinger bands sharing the input's time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerSeries {
    /// Middle band plus `multiplier` standard deviations.
    pub upper: Series<IndicatorPoint>,
    /// Simple moving average.
    pub middle: Series<IndicatorPoint>,
    /// Middle band minus `multiplier` standard deviations.
    pub lower: Series<IndicatorPoint>,
}

/// Runs a streaming indicator over `series`, one output point per input point.
///
/// A value that overflows to a non-finite number is reported as `None`.
pub fn apply<P, T>(series: &Series<P>, mut indicator: T) -> Series<IndicatorPoint>
where
    P: SeriesPoint + Input,
    T: Indicator<Input = f64, Output = f64>,
{
    let points = series
        .iter()
        .map(|point| {
            let value = indicator.next(point.value()).filter(|v| v.is_finite());
            IndicatorPoint::new(point.time(), value)
        })
        .collect();
    Series::new_unchecked(points)
}

/// Simple moving average over the trailing `period` values.
pub fn sma<P>(series: &Series<P>, period: usize) -> IndicatorResult<Series<IndicatorPoint>>
where
    P: SeriesPoint + Input,
{
    let indicator = Sma::new(period)?;
    debug!(indicator = "sma", period, len = series.len(), "computing indicator series");
    Ok(apply(series, indicator))
}

/// Exponential moving average seeded by the SMA of the first `period` values.
pub fn ema<P>(series: &Series<P>, period: usize) -> IndicatorResult<Series<IndicatorPoint>>
where
    P: SeriesPoint + Input,
{
    let indicator = Ema::new(period)?;
    debug!(indicator = "ema", period, len = series.len(), "computing indicator series");
    Ok(apply(series, indicator))
}

/// Relative strength index; the first `period` positions are empty.
pub fn rsi<P>(series: &Series<P>, period: usize) -> IndicatorResult<Series<IndicatorPoint>>
where
    P: SeriesPoint + Input,
{
    let indicator = Rsi::new(period)?;
    debug!(indicator = "rsi", period, len = series.len(), "computing indicator series");
    Ok(apply(series, indicator))
}

/// MACD line, signal line and histogram.
///
/// The signal EMA runs over the defined MACD points only and is then matched
/// back onto the input axis by timestamp.
pub fn macd<P>(
    series: &Series<P>,
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> IndicatorResult<MacdSeries>
where
    P: SeriesPoint + Input,
{
    ensure_period("MACD", fast_period)?;
    ensure_period("MACD", slow_period)?;
    ensure_period("MACD", signal_period)?;
    debug!(
        indicator = "macd",
        fast_period,
        slow_period,
        signal_period,
        len = series.len(),
        "computing indicator series"
    );

    let fast = ema(series, fast_period)?;
    let slow = ema(series, slow_period)?;
    let macd_line = combine(&fast, &slow, |f, s| f - s);

    let defined = Series::new_unchecked(
        macd_line
            .iter()
            .filter_map(|p| p.value.map(|value| TimePoint::new(p.time, value)))
            .collect(),
    );
    let signal_line = ema(&defined, signal_period)?.align_to(series);
    let histogram = combine(&macd_line, &signal_line, |m, s| m - s);

    Ok(MacdSeries {
        macd_line,
        signal_line,
        histogram,
    })
}

/// Bollinger bands around the SMA, `multiplier` population deviations wide.
pub fn bollinger_bands<P>(
    series: &Series<P>,
    period: usize,
    multiplier: f64,
) -> IndicatorResult<BollingerSeries>
where
    P: SeriesPoint + Input,
{
    let mut indicator = BollingerBands::<f64>::new(period, multiplier)?;
    debug!(
        indicator = "bollinger",
        period,
        multiplier,
        len = series.len(),
        "computing indicator series"
    );

    let len = series.len();
    let mut upper = Vec::with_capacity(len);
    let mut middle = Vec::with_capacity(len);
    let mut lower = Vec::with_capacity(len);
    for point in series.iter() {
        let time = point.time();
        let bands = indicator
            .next(point.value())
            .filter(|b| b.upper.is_finite() && b.lower.is_finite());
        upper.push(IndicatorPoint::new(time, bands.map(|b| b.upper)));
        middle.push(IndicatorPoint::new(time, bands.map(|b| b.middle)));
        lower.push(IndicatorPoint::new(time, bands.map(|b| b.lower)));
    }

    Ok(BollingerSeries {
        upper: Series::new_unchecked(upper),
        middle: Series::new_unchecked(middle),
        lower: Series::new_unchecked(lower),
    })
}

fn combine<F>(
    left: &Series<IndicatorPoint>,
    right: &Series<IndicatorPoint>,
    op: F,
) -> Series<IndicatorPoint>
where
    F: Fn(f64, f64) -> f64,
{
    let points = left
        .iter()
        .zip(right.iter())
        .map(|(l, r)| {
            let value = l
                .value
                .zip(r.value)
                .map(|(a, b)| op(a, b))
                .filter(|v| v.is_finite());
            IndicatorPoint::new(l.time, value)
        })
        .collect();
    Series::new_unchecked(points)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::indicators::Macd;

    fn line(values: &[f64]) -> Series<TimePoint> {
        Series::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| TimePoint::new(i as i64 * 86_400, *v))
                .collect(),
        )
        .unwrap()
    }

    fn values(series: &Series<IndicatorPoint>) -> Vec<Option<f64>> {
        series.iter().map(|p| p.value).collect()
    }

    #[test]
    fn sma_matches_known_values() {
        let out = sma(&line(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3).unwrap();
        assert_eq!(values(&out), vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn sma_longer_than_series_is_all_empty() {
        let out = sma(&line(&[1.0, 2.0]), 5).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.defined_count(), 0);
    }

    #[test]
    fn ema_seed_matches_sma() {
        let input = line(&[3.0, 7.0, 4.0, 9.0, 1.0, 6.0]);
        let e = ema(&input, 4).unwrap();
        let s = sma(&input, 4).unwrap();
        assert_eq!(e[3].value, s[3].value);
        assert!(e[2].value.is_none());
        let k = 2.0 / 5.0;
        let seed = s[3].value.unwrap();
        assert_relative_eq!(e[4].value.unwrap(), (1.0 - seed) * k + seed);
    }

    #[test]
    fn rsi_empty_until_period() {
        let out = rsi(&line(&[1.0, 2.0, 3.0, 2.0, 1.0]), 3).unwrap();
        assert_eq!(out.defined_count(), 2);
        assert!(out[2].value.is_none());
        assert!(out[3].value.is_some());
    }

    #[test]
    fn macd_signal_realigns_by_time() {
        let input = line(&(1..=40).map(|i| (i as f64).sqrt() * 10.0).collect::<Vec<_>>());
        let result = macd(&input, 3, 6, 4).unwrap();
        assert_eq!(result.macd_line.len(), 40);
        assert_eq!(result.signal_line.len(), 40);
        // MACD starts at index 5; the signal needs four MACD values.
        assert!(result.macd_line[4].value.is_none());
        assert!(result.macd_line[5].value.is_some());
        assert!(result.signal_line[7].value.is_none());
        assert!(result.signal_line[8].value.is_some());
        for (i, point) in result.signal_line.iter().enumerate() {
            assert_eq!(point.time, input[i].time);
        }
    }

    #[test]
    fn batch_macd_agrees_with_streaming() {
        let input = line(&(0..60).map(|i| 50.0 + (i as f64 * 0.3).sin() * 5.0).collect::<Vec<_>>());
        let batch = macd(&input, 12, 26, 9).unwrap();
        let mut streaming = Macd::new(12, 26, 9).unwrap();
        for (i, point) in input.iter().enumerate() {
            let step = streaming.next(point.value);
            assert_eq!(step.map(|o| o.macd), batch.macd_line[i].value);
            assert_eq!(step.and_then(|o| o.signal), batch.signal_line[i].value);
        }
    }

    #[test]
    fn bollinger_middle_is_sma() {
        let input = line(&[10.0, 11.0, 12.0, 13.0, 14.0, 12.0, 9.0]);
        let bands = bollinger_bands(&input, 5, 2.0).unwrap();
        assert_eq!(bands.middle, sma(&input, 5).unwrap());
        assert!(bands.upper[3].value.is_none());
        assert_relative_eq!(bands.upper[4].value.unwrap(), 14.828427124746, epsilon = 1e-9);
    }

    #[test]
    fn mixed_magnitudes_keep_true_window_means() {
        let input = line(&[1e20, 1.0, 2.0, 3.0]);
        let expected = vec![None, Some(5e19), Some(1.5), Some(2.5)];
        assert_eq!(values(&sma(&input, 2).unwrap()), expected);
        let bands = bollinger_bands(&input, 2, 2.0).unwrap();
        assert_eq!(values(&bands.middle), expected);

        let spiked = line(&[1e308, 1e308, 1.0, 1.0, 1.0]);
        assert_eq!(
            values(&sma(&spiked, 2).unwrap()),
            vec![None, Some(1e308), Some(5e307), Some(1.0), Some(1.0)]
        );
    }

    #[test]
    fn zero_periods_fail_fast() {
        let input = line(&[1.0, 2.0, 3.0]);
        assert!(sma(&input, 0).unwrap_err().is_invalid_argument());
        assert!(ema(&input, 0).is_err());
        assert!(rsi(&input, 0).is_err());
        assert!(macd(&input, 12, 26, 0).is_err());
        assert!(bollinger_bands(&input, 0, 2.0).is_err());
        assert!(bollinger_bands(&input, 5, -0.5).is_err());
    }
}
