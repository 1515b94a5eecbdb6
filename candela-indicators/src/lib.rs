#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//! Composable technical indicators over `f64` time series.

/// Indicator composition helpers such as `PipedIndicator`.
pub mod combinators;
/// Foundational traits and shared abstractions.
pub mod core;
/// Built-in streaming indicator implementations.
pub mod indicators;
/// Whole-series indicator functions with positionally aligned output.
pub mod series;

/// Re-export of the piped indicator combinator for convenience.
pub use crate::combinators::PipedIndicator;
/// Re-export of the core traits and error type to make the crate easy to consume.
pub use crate::core::{Indicator, IndicatorError, IndicatorResult, Input};
/// Re-export of the batch functions and their composite outputs.
pub use crate::series::{bollinger_bands, ema, macd, rsi, sma, BollingerSeries, MacdSeries};
