//! Exponential Moving Average (EMA).

use std::marker::PhantomData;

use crate::core::{ensure_period, window_mean, Indicator, IndicatorResult, Input};

/// Exponentially-weighted moving average with smoothing `2 / (period + 1)`,
/// seeded by the simple average of the first `period` inputs.
#[derive(Debug, Clone)]
pub struct Ema<I = f64> {
    period: usize,
    alpha: f64,
    divisor: f64,
    state: Option<f64>,
    warmup: Vec<f64>,
    marker: PhantomData<I>,
}

impl<I> Ema<I>
where
    I: Input,
{
    /// Creates a new EMA with the provided period.
    pub fn new(period: usize) -> IndicatorResult<Self> {
        ensure_period("EMA", period)?;

        Ok(Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            divisor: period as f64,
            state: None,
            warmup: Vec::with_capacity(period),
            marker: PhantomData,
        })
    }

    /// Returns the current EMA value, if the indicator has produced one.
    pub fn value(&self) -> Option<f64> {
        self.state
    }
}

impl<I> Indicator for Ema<I>
where
    I: Input,
{
    type Input = I;
    type Output = f64;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        let value = input.value();

        match self.state {
            Some(current) => {
                let next = (value - current) * self.alpha + current;
                self.state = Some(next);
                Some(next)
            }
            None => {
                self.warmup.push(value);
                if self.warmup.len() == self.period {
                    let average = window_mean(&self.warmup, self.divisor);
                    self.state = Some(average);
                    self.warmup.clear();
                    Some(average)
                } else {
                    None
                }
            }
        }
    }

    fn reset(&mut self) {
        self.state = None;
        self.warmup.clear();
    }
}
