//! Bollinger Bands indicator built on top of SMA and standard deviation.

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::core::{ensure_period, Indicator, IndicatorError, IndicatorResult, Input};
use crate::indicators::sma::Sma;

/// Conventional Bollinger lookback.
pub const DEFAULT_PERIOD: usize = 20;
/// Conventional band width in standard deviations.
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Output value of the Bollinger Bands indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBandsOutput {
    /// Upper band (mean + k * std dev).
    pub upper: f64,
    /// Middle band (rolling mean).
    pub middle: f64,
    /// Lower band (mean - k * std dev).
    pub lower: f64,
}

/// Produces Bollinger Bands from a rolling window.
///
/// The deviation is the population standard deviation of the window
/// (divided by `period`, not `period - 1`).
#[derive(Debug, Clone)]
pub struct BollingerBands<I = f64> {
    period: usize,
    divisor: f64,
    std_multiplier: f64,
    mean: Sma<f64>,
    window: VecDeque<f64>,
    marker: PhantomData<I>,
}

impl<I> BollingerBands<I>
where
    I: Input,
{
    /// Creates a new Bollinger Bands indicator.
    pub fn new(period: usize, std_multiplier: f64) -> IndicatorResult<Self> {
        ensure_period("BollingerBands", period)?;
        if !std_multiplier.is_finite() || std_multiplier < 0.0 {
            return Err(IndicatorError::invalid_parameter(
                "BollingerBands",
                "std_multiplier",
                std_multiplier,
            ));
        }

        Ok(Self {
            period,
            divisor: period as f64,
            std_multiplier,
            mean: Sma::new(period)?,
            window: VecDeque::with_capacity(period + 1),
            marker: PhantomData,
        })
    }

    fn compute_bands(&self, middle: f64) -> BollingerBandsOutput {
        let variance = self
            .window
            .iter()
            .map(|value| {
                let deviation = value - middle;
                deviation * deviation
            })
            .sum::<f64>()
            / self.divisor;
        let offset = self.std_multiplier * variance.sqrt();

        BollingerBandsOutput {
            upper: middle + offset,
            middle,
            lower: middle - offset,
        }
    }
}

impl<I> Indicator for BollingerBands<I>
where
    I: Input,
{
    type Input = I;
    type Output = BollingerBandsOutput;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        let value = input.value();
        self.window.push_back(value);
        if self.window.len() > self.period {
            self.window.pop_front();
        }

        let middle = self.mean.next(value)?;
        Some(self.compute_bands(middle))
    }

    fn reset(&mut self) {
        self.mean.reset();
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::BollingerBands;
    use crate::Indicator;

    #[test]
    fn computes_expected_bands() {
        let mut bb = BollingerBands::new(5, 2.0).unwrap();
        let mut output = None;
        for value in [10.0, 11.0, 12.0, 13.0, 14.0] {
            output = bb.next(value);
        }

        let bands = output.unwrap();
        assert_abs_diff_eq!(bands.middle, 12.0, epsilon = 1e-8);
        assert_abs_diff_eq!(bands.upper, 14.82842712, epsilon = 1e-8);
        assert_abs_diff_eq!(bands.lower, 9.17157288, epsilon = 1e-8);
    }

    #[test]
    fn respects_reset() {
        let mut bb = BollingerBands::new(2, 1.0).unwrap();
        bb.next(1.0);
        let first = bb.next(3.0).unwrap();
        assert_abs_diff_eq!(first.middle, 2.0);
        assert_abs_diff_eq!(first.upper, 3.0);
        bb.reset();
        assert_eq!(bb.next(3.0), None);
    }

    #[test]
    fn rejects_negative_multiplier() {
        let err = BollingerBands::<f64>::new(5, -1.0).unwrap_err();
        assert!(matches!(
            err,
            crate::IndicatorError::InvalidParameter { .. }
        ));
        assert!(BollingerBands::<f64>::new(5, f64::NAN).is_err());
    }
}
