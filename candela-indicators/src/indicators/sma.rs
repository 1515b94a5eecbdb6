//! Simple Moving Average (SMA).

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::core::{ensure_period, window_mean, Indicator, IndicatorResult, Input};

/// Arithmetic mean of the trailing `period` inputs.
///
/// The window is re-summed on every step; a huge or non-finite input only
/// affects the windows that contain it.
#[derive(Debug, Clone)]
pub struct Sma<I = f64> {
    period: usize,
    divisor: f64,
    window: VecDeque<f64>,
    marker: PhantomData<I>,
}

impl<I> Sma<I>
where
    I: Input,
{
    /// Creates a new SMA with the provided period.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        ensure_period("SMA", period)?;
        Ok(Self {
            period,
            divisor: period as f64,
            window: VecDeque::with_capacity(period + 1),
            marker: PhantomData,
        })
    }

    /// Returns the configured lookback period.
    pub fn period(&self) -> usize {
        self.period
    }
}

impl<I> Indicator for Sma<I>
where
    I: Input,
{
    type Input = I;
    type Output = f64;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        self.window.push_back(input.value());
        if self.window.len() > self.period {
            self.window.pop_front();
        }
        (self.window.len() == self.period).then(|| window_mean(&self.window, self.divisor))
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}
