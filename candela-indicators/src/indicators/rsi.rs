//! Relative Strength Index (RSI).

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::core::{ensure_period, Indicator, IndicatorResult, Input};

/// Conventional RSI lookback.
pub const DEFAULT_PERIOD: usize = 14;

/// RSI oscillator scaled between 0 and 100.
///
/// Average gain and loss are plain means over the trailing `period` deltas,
/// not Wilder-smoothed. A window without losses reads 100, including a
/// perfectly flat window.
#[derive(Debug, Clone)]
pub struct Rsi<I = f64> {
    period: usize,
    divisor: f64,
    prev_value: Option<f64>,
    gains: VecDeque<f64>,
    losses: VecDeque<f64>,
    marker: PhantomData<I>,
}

impl<I> Rsi<I>
where
    I: Input,
{
    /// Creates a new RSI with the provided period.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        ensure_period("RSI", period)?;

        Ok(Self {
            period,
            divisor: period as f64,
            prev_value: None,
            gains: VecDeque::with_capacity(period + 1),
            losses: VecDeque::with_capacity(period + 1),
            marker: PhantomData,
        })
    }

    fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            100.0
        } else if avg_gain == 0.0 {
            0.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - 100.0 / (1.0 + rs)
        }
    }
}

impl<I> Indicator for Rsi<I>
where
    I: Input,
{
    type Input = I;
    type Output = f64;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        let value = input.value();
        let prev = self.prev_value.replace(value)?;

        let change = value - prev;
        self.gains.push_back(change.max(0.0));
        self.losses.push_back((-change).max(0.0));

        if self.gains.len() > self.period {
            self.gains.pop_front();
            self.losses.pop_front();
        }
        if self.gains.len() < self.period {
            return None;
        }

        // Summed fresh each step so rounding drift cannot leave a phantom loss.
        let avg_gain = self.gains.iter().sum::<f64>() / self.divisor;
        let avg_loss = self.losses.iter().sum::<f64>() / self.divisor;
        Some(Self::compute_rsi(avg_gain, avg_loss))
    }

    fn reset(&mut self) {
        self.prev_value = None;
        self.gains.clear();
        self.losses.clear();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::Rsi;
    use crate::Indicator;

    #[test]
    fn waits_for_initial_window() {
        let mut rsi = Rsi::new(3).unwrap();
        assert_eq!(rsi.next(1.0), None);
        assert_eq!(rsi.next(2.0), None);
        assert_eq!(rsi.next(3.0), None);
        assert!(rsi.next(2.0).is_some());
    }

    #[test]
    fn computes_expected_values() {
        let mut rsi = Rsi::new(3).unwrap();
        let series = [1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0];
        let outputs: Vec<_> = series.into_iter().filter_map(|v| rsi.next(v)).collect();
        let expected = [
            200.0 / 3.0,
            100.0 / 3.0,
            100.0 / 3.0,
            200.0 / 3.0,
            100.0,
        ];

        assert_eq!(outputs.len(), expected.len());
        for (lhs, rhs) in outputs.iter().zip(expected.iter()) {
            assert_relative_eq!(*lhs, *rhs, epsilon = 1e-10);
        }
    }

    #[test]
    fn reset_clears_buffers() {
        let mut rsi = Rsi::new(2).unwrap();
        rsi.next(1.0);
        rsi.next(2.0);
        assert!(rsi.next(3.0).is_some());
        rsi.reset();
        assert_eq!(rsi.next(3.0), None);
    }

    #[test]
    fn constant_input_registers_as_overbought() {
        let mut rsi = Rsi::new(3).unwrap();
        for _ in 0..3 {
            rsi.next(1.0);
        }
        assert_eq!(rsi.next(1.0), Some(100.0));
    }

    #[test]
    fn falling_window_reads_zero() {
        let mut rsi = Rsi::new(2).unwrap();
        rsi.next(3.0);
        rsi.next(2.0);
        assert_eq!(rsi.next(1.0), Some(0.0));
    }
}
