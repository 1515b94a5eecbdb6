//! Moving Average Convergence Divergence indicator implementation.

use crate::core::{ensure_period, Indicator, IndicatorResult};
use crate::indicators::ema::Ema;

/// Conventional fast EMA period.
pub const DEFAULT_FAST_PERIOD: usize = 12;
/// Conventional slow EMA period.
pub const DEFAULT_SLOW_PERIOD: usize = 26;
/// Conventional signal EMA period.
pub const DEFAULT_SIGNAL_PERIOD: usize = 9;

/// MACD output for one step.
///
/// The MACD line is available as soon as both EMAs are warm; the signal line
/// and histogram need a further `signal_period` MACD values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MacdOutput {
    /// MACD line value (fast EMA minus slow EMA).
    pub macd: f64,
    /// Signal line value (EMA of the MACD line).
    pub signal: Option<f64>,
    /// Histogram representing the distance between MACD and signal lines.
    pub histogram: Option<f64>,
}

/// Moving Average Convergence Divergence indicator.
///
/// `fast_period < slow_period` is conventional but not enforced.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    /// Create a MACD indicator with custom fast/slow/signal periods.
    pub fn new(
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    ) -> IndicatorResult<Self> {
        ensure_period("MACD", fast_period)?;
        ensure_period("MACD", slow_period)?;
        ensure_period("MACD", signal_period)?;
        Ok(Self {
            fast: Ema::new(fast_period)?,
            slow: Ema::new(slow_period)?,
            signal: Ema::new(signal_period)?,
        })
    }
}

impl Indicator for Macd {
    type Input = f64;
    type Output = MacdOutput;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        let fast = self.fast.next(input);
        let slow = self.slow.next(input);
        let macd = fast? - slow?;
        let signal = self.signal.next(macd);
        Some(MacdOutput {
            macd,
            signal,
            histogram: signal.map(|signal_line| macd - signal_line),
        })
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
    }
}
