//! Traits and the error type shared by every indicator.

use candela_core::{OhlcPoint, TimePoint};
use thiserror::Error;

/// Result alias for indicator construction and batch computation.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// A stateful indicator fed one input at a time.
pub trait Indicator {
    /// Type of value consumed per step.
    type Input;
    /// Type of value produced once the indicator has warmed up.
    type Output;

    /// Feeds the next input, returning `None` while history is insufficient.
    fn next(&mut self, input: Self::Input) -> Option<Self::Output>;

    /// Discards all accumulated history.
    fn reset(&mut self);
}

/// Anything that can be reduced to the scalar an indicator consumes.
pub trait Input {
    /// Scalar value fed to the indicator.
    fn value(&self) -> f64;
}

impl Input for f64 {
    fn value(&self) -> f64 {
        *self
    }
}

impl Input for TimePoint {
    fn value(&self) -> f64 {
        self.value
    }
}

/// Bars are measured at their close.
impl Input for OhlcPoint {
    fn value(&self) -> f64 {
        self.close
    }
}

/// Errors raised when an indicator is configured with unusable parameters.
///
/// Both variants belong to the invalid-argument class: they are caller
/// errors, detected before any computation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// A lookback period was zero.
    #[error("invalid argument: {indicator} period must be at least 1 (got {period})")]
    InvalidPeriod {
        /// Name of the indicator that rejected the period.
        indicator: &'static str,
        /// The rejected period.
        period: usize,
    },
    /// A non-period parameter was out of range.
    #[error("invalid argument: {indicator} parameter `{name}` is out of range (got {value})")]
    InvalidParameter {
        /// Name of the indicator that rejected the parameter.
        indicator: &'static str,
        /// Parameter name.
        name: &'static str,
        /// Rendered rejected value.
        value: String,
    },
}

impl IndicatorError {
    /// Builds an [`IndicatorError::InvalidPeriod`].
    pub fn invalid_period(indicator: &'static str, period: usize) -> Self {
        Self::InvalidPeriod { indicator, period }
    }

    /// Builds an [`IndicatorError::InvalidParameter`].
    pub fn invalid_parameter(
        indicator: &'static str,
        name: &'static str,
        value: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidParameter {
            indicator,
            name,
            value: value.to_string(),
        }
    }

    /// Always true; lets callers treat every indicator error as an invalid argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidPeriod { .. } | Self::InvalidParameter { .. }
        )
    }
}

pub(crate) fn ensure_period(indicator: &'static str, period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::invalid_period(indicator, period));
    }
    Ok(())
}

/// Arithmetic mean of a full window, summed fresh on every call.
///
/// When the plain sum overflows, each value is scaled by `divisor` first so a
/// window of large but finite values still has a finite mean.
pub(crate) fn window_mean<'a, W>(window: W, divisor: f64) -> f64
where
    W: IntoIterator<Item = &'a f64> + Copy,
{
    let sum: f64 = window.into_iter().sum();
    if sum.is_finite() {
        sum / divisor
    } else {
        window.into_iter().map(|value| value / divisor).sum()
    }
}
