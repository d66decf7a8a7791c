//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A sale screen summing 2 × R$ 250,10 + 1 × R$ 320,20 in floats can     │
//! │  drift by a centavo and show a profit that does not match the ledger.  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    25010 × 2 + 32020 = 82040 centavos, exactly                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tiresaas_core::money::Money;
//!
//! // Create from centavos (preferred)
//! let price = Money::from_cents(25000); // R$ 250.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;                        // R$ 500.00
//! let total = price + Money::from_cents(500);     // R$ 255.00
//! assert_eq!(doubled.cents(), 50000);
//! assert_eq!(total.cents(), 25500);
//!
//! // Text typed into a form field is parsed, never converted from f64
//! let typed: Money = "250,00".parse().unwrap();
//! assert_eq!(typed, price);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for losses and refunds
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price_cents ──► LineItem.unit_price ──► LineItem.subtotal     │
/// │  Product.cost_cents  ──► LineItem.unit_cost  ──► LineItem.profit       │
/// │                                                                         │
/// │  Σ subtotal − overall discount ──► SaleTotals.total ──► margin         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tiresaas_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents R$ 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (reais and centavos).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -R$ 5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (centavos) portion, always 0-99.
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tiresaas_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(25000); // R$ 250.00
    /// let gross = unit_price.multiply_quantity(3);
    /// assert_eq!(gross.cents(), 75000); // R$ 750.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Expresses `self` as a share of `whole`, in basis points.
    ///
    /// Rounds half away from zero. A `whole` of zero or less has no
    /// meaningful share and yields 0.
    ///
    /// ## Example
    /// ```rust
    /// use tiresaas_core::money::Money;
    ///
    /// let profit = Money::from_cents(21000);
    /// let total = Money::from_cents(75000);
    /// assert_eq!(profit.ratio_bps(total), 2800); // 28.00%
    /// assert_eq!(profit.ratio_bps(Money::zero()), 0);
    /// ```
    pub fn ratio_bps(&self, whole: Money) -> i64 {
        if whole.0 <= 0 {
            return 0;
        }

        // i128 keeps `amount × 10_000` from overflowing on large sales
        let numerator = self.0 as i128 * 10_000;
        let denominator = whole.0 as i128;
        let half = denominator / 2;

        let rounded = if numerator >= 0 {
            (numerator + half) / denominator
        } else {
            (numerator - half) / denominator
        };

        rounded as i64
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money the way the sales screen prints totals.
///
/// ## Note
/// Symbol placement and decimal separator are fixed here; use
/// `AppConfig::format_currency` for configurable output.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {}.{:02}",
            sign,
            self.major().abs(),
            self.minor_part()
        )
    }
}

/// Parses an amount typed by a user.
///
/// Accepts an optional leading `-`, digits, and either `.` or `,` as the
/// decimal separator with at most two fractional digits. Thousands
/// separators are rejected.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let raw = s.trim();
        let (negative, unsigned) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let normalized = unsigned.replace(',', ".");
        let (major_str, minor_str) = match normalized.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (normalized.as_str(), None),
        };

        if major_str.is_empty() && minor_str.map_or(true, str::is_empty) {
            return Err(invalid("amount is empty"));
        }

        if !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected digits"));
        }

        let major: i64 = if major_str.is_empty() {
            0
        } else {
            major_str
                .parse()
                .map_err(|_| invalid("amount is too large"))?
        };

        let minor: i64 = match minor_str {
            None | Some("") => 0,
            Some(m) if m.len() > 2 || !m.chars().all(|c| c.is_ascii_digit()) => {
                return Err(invalid("at most two decimal digits"));
            }
            Some(m) => {
                let value: i64 = m.parse().map_err(|_| invalid("expected digits"))?;
                if m.len() == 1 {
                    value * 10
                } else {
                    value
                }
            }
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(250, 0).cents(), 25000);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(75000)), "R$ 750.00");
        assert_eq!(format!("{}", Money::from_cents(505)), "R$ 5.05");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-R$ 5.50");
        assert_eq!(format!("{}", Money::zero()), "R$ 0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_parse_accepts_form_input() {
        assert_eq!("250".parse::<Money>().unwrap().cents(), 25000);
        assert_eq!("250.00".parse::<Money>().unwrap().cents(), 25000);
        assert_eq!("250,5".parse::<Money>().unwrap().cents(), 25050);
        assert_eq!(" 0.07 ".parse::<Money>().unwrap().cents(), 7);
        assert_eq!(".5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!("12.".parse::<Money>().unwrap().cents(), 1200);
        assert_eq!("-3.10".parse::<Money>().unwrap().cents(), -310);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1.234,56".parse::<Money>().is_err());
        assert!("1e3".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_ratio_bps_rounding() {
        let total = Money::from_cents(30000);
        assert_eq!(Money::from_cents(10000).ratio_bps(total), 3333);
        assert_eq!(Money::from_cents(20000).ratio_bps(total), 6667);
        assert_eq!(Money::from_cents(-10000).ratio_bps(total), -3333);
        assert_eq!(Money::from_cents(500).ratio_bps(Money::from_cents(-1)), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }
}
