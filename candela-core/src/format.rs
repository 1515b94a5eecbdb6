//! Price and volume display formatters for axis labels and tooltips.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure raised when a formatter is configured with unusable parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// The tick size is zero, negative or not representable.
    #[error("invalid argument: min_move must be a positive finite number (got {0})")]
    InvalidMinMove(f64),
    /// Band bounds are not finite or are inverted.
    #[error("invalid argument: band bounds must satisfy low <= high (got low={low}, high={high})")]
    InvalidBands {
        /// Requested lower bound.
        low: f64,
        /// Requested upper bound.
        high: f64,
    },
}

/// Fixed-precision formatter that snaps prices to the nearest tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceFormat {
    precision: u32,
    min_move: Decimal,
}

impl PriceFormat {
    /// Creates a formatter printing `precision` decimals on a `min_move` tick grid.
    pub fn new(precision: u32, min_move: f64) -> Result<Self, FormatError> {
        let tick = Decimal::from_f64(min_move)
            .filter(|tick| tick.is_sign_positive() && !tick.is_zero())
            .ok_or(FormatError::InvalidMinMove(min_move))?;
        Ok(Self {
            precision,
            min_move: tick,
        })
    }

    /// Number of printed decimals.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Rounds `value` to a multiple of the minimum move, then prints `precision` decimals.
    ///
    /// Values outside the exact decimal range are printed as plain floats.
    pub fn format(&self, value: f64) -> String {
        Decimal::from_f64(value)
            .and_then(|price| price.checked_div(self.min_move))
            .map(|ticks| ticks.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|ticks| ticks.checked_mul(self.min_move))
            .map(|snapped| fixed(snapped, self.precision))
            .unwrap_or_else(|| value.to_string())
    }
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            precision: 2,
            min_move: Decimal::new(1, 2),
        }
    }
}

/// Formats `value` as money: symbol prefix, thousands separators, fixed decimals.
///
/// `format_currency(1234.5, "¥", 2)` yields `¥1,234.50`.
pub fn format_currency(value: f64, symbol: &str, precision: u32) -> String {
    let Some(amount) = Decimal::from_f64(value) else {
        return value.to_string();
    };
    let text = fixed(amount.abs(), precision);
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };
    let mut out = String::with_capacity(text.len() + symbol.len() + 4);
    if amount.is_sign_negative() && !amount.round_dp(precision).is_zero() {
        out.push('-');
    }
    out.push_str(symbol);
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Formats a fraction as a percentage, e.g. `0.1234` at precision 2 is `12.34%`.
pub fn format_percent(value: f64, precision: u32) -> String {
    let percent = Decimal::from_f64(value)
        .and_then(|fraction| fraction.checked_mul(Decimal::ONE_HUNDRED));
    match percent {
        Some(percent) => format!("{}%", fixed(percent, precision)),
        None => format!("{value}%"),
    }
}

/// Abbreviates large volumes with `K`, `M` and `B` suffixes.
pub fn format_volume(volume: f64) -> String {
    if volume >= 1_000_000_000.0 {
        format!("{:.1}B", volume / 1_000_000_000.0)
    } else if volume >= 1_000_000.0 {
        format!("{:.1}M", volume / 1_000_000.0)
    } else if volume >= 1_000.0 {
        format!("{:.1}K", volume / 1_000.0)
    } else {
        volume.to_string()
    }
}

/// Labels values by band: whole numbers above `high`, two decimals below `low`,
/// one decimal in between.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandedFormat {
    /// Values above this print as `High:` with no decimals.
    pub high: f64,
    /// Values below this print as `Low:` with two decimals.
    pub low: f64,
}

impl BandedFormat {
    /// Creates bands, rejecting non-finite or inverted bounds.
    pub fn new(low: f64, high: f64) -> Result<Self, FormatError> {
        if !(low.is_finite() && high.is_finite()) || low > high {
            return Err(FormatError::InvalidBands { low, high });
        }
        Ok(Self { high, low })
    }

    /// Labels `value` with its band.
    pub fn format(&self, value: f64) -> String {
        if value > self.high {
            format!("High: {value:.0}")
        } else if value < self.low {
            format!("Low: {value:.2}")
        } else {
            format!("Mid: {value:.1}")
        }
    }
}

impl Default for BandedFormat {
    fn default() -> Self {
        Self {
            high: 100.0,
            low: 50.0,
        }
    }
}

fn fixed(value: Decimal, precision: u32) -> String {
    let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", precision as usize, rounded)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
