use thiserror::Error;

/// Result alias for series construction and editing.
pub type SeriesResult<T> = Result<T, SeriesError>;

/// Error type surfaced when a series or one of its arguments is malformed.
///
/// Every variant is a caller error of the invalid-argument class: it is
/// reported synchronously and never corrected on the caller's behalf.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    /// A timestamp is not strictly later than the one before it.
    #[error("invalid argument: time {time} at index {index} is not after {previous}")]
    NonAscendingTime {
        /// Position of the offending point.
        index: usize,
        /// Its timestamp.
        time: i64,
        /// Timestamp of the preceding point.
        previous: i64,
    },
    /// A point carries a non-finite number or an inconsistent bar.
    #[error("invalid argument: point at index {index} is not finite or violates its invariants")]
    MalformedPoint {
        /// Position of the offending point.
        index: usize,
    },
    /// A count that must be positive was zero.
    #[error("invalid argument: {name} must be at least 1")]
    ZeroCount {
        /// Argument name.
        name: &'static str,
    },
    /// An index past the end of the series.
    #[error("invalid argument: index {index} out of range for series of length {len}")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Series length.
        len: usize,
    },
    /// The daily time axis would leave the `i64` range.
    #[error("invalid argument: {count} daily points before {start} overflow the time range")]
    TimeOverflow {
        /// Requested number of points.
        count: usize,
        /// Timestamp of the last point.
        start: i64,
    },
    /// A generator setting is out of its accepted range.
    #[error("invalid argument: setting `{name}` is out of range")]
    InvalidSetting {
        /// Setting name.
        name: &'static str,
    },
}

impl SeriesError {
    /// Always true; kept so callers can classify errors uniformly across crates.
    pub fn is_invalid_argument(&self) -> bool {
        true
    }
}
