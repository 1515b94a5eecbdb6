#![deny(missing_docs)]

//! Core domain types shared by the Candela generator and indicator crates.

/// Series validation errors.
pub mod error;
/// Display formatters for prices, percentages and volumes.
pub mod format;
/// Point kinds stored in a series.
pub mod point;
/// The time-ordered series container.
pub mod series;

pub use error::{SeriesError, SeriesResult};
pub use point::{Direction, IndicatorPoint, OhlcPoint, SeriesPoint, TimePoint, VolumeBar};
pub use series::Series;

/// Number of seconds in one calendar day, the spacing of generated series.
pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
