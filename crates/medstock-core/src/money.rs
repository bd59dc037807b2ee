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
//! │    49.99 + 150.00 = 199.99000000000001  ❌ WRONG!                       │
//! │                                                                         │
//! │  A customer's lifetime spend is the sum of hundreds of sales.           │
//! │  Float drift shows up as 199.98 on one screen and 199.99 on another.    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    4999 + 15000 = 19999 cents, exactly, forever                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! Amounts always carry exactly 2 decimal places. The only place a value with
//! more precision can enter is [`Money::parse`], which rounds half-up at the
//! third decimal. Line totals (`unit_price × quantity`) and sums are exact in
//! cents, so no further rounding ever happens downstream.
//!
//! ## Usage
//! ```rust
//! use medstock_core::money::Money;
//!
//! let price = Money::from_cents(10000); // 100.00
//! let line_total = price.checked_multiply_quantity(3).unwrap();
//! assert_eq!(line_total.to_string(), "300.00");
//!
//! let parsed: Money = "49.99".parse().unwrap();
//! assert_eq!(parsed.cents(), 4999);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents, kuruş).
///
/// ## Design Decisions
/// - **i64 (signed)**: Matches SQLite INTEGER, comparisons are cheap
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde as integer cents**: The database and core types all speak cents;
///   only the service boundary renders `"300.00"` strings
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.unit_price ──► SaleLine.unit_price ──► SaleLine.total          │
/// │                                                      │                  │
/// │                                       Σ totals ──► Sale.final_amount    │
/// │                                                      │                  │
/// │                        Customer.total_spent ◄── += ──┤                  │
/// │                                                      │                  │
/// │                        Dashboard revenue    ◄── Σ ───┘                  │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use medstock_core::money::Money;
    ///
    /// let price = Money::from_cents(4999); // 49.99
    /// assert_eq!(price.cents(), 4999);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies a unit price by a line quantity, or `None` on overflow.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Nitrile Gloves (M) 100.00
    /// Quantity: 3
    ///      │
    ///      ▼
    /// checked_multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: 300.00
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Overflow-checked addition.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Parses a decimal amount such as `"49.99"`, `"100"` or `"10.005"`.
    ///
    /// ## Rounding: half-up at the third decimal
    /// ```text
    /// "10.004" → 10.00
    /// "10.005" → 10.01
    /// "10.0049999" → 10.00   (only the third decimal decides)
    /// ```
    /// Negative values round half away from zero (`"-1.005"` → -1.01).
    ///
    /// ## Errors
    /// [`ValidationError::InvalidFormat`] for anything that is not an optional
    /// sign, digits, and at most one decimal point, or that overflows.
    pub fn parse(input: &str) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = input.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("must contain digits"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("must be a decimal number like 49.99"));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount is too large"))?
        };

        let mut frac_digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().unwrap_or(0) >= 5;

        let cents = whole_value
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Renders the amount with exactly two decimal digits and no symbol.
    ///
    /// This is the wire format for every money field the UI receives.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays `"300.00"`; the currency symbol is a presentation concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

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
        let money = Money::from_cents(4999);
        assert_eq!(money.cents(), 4999);
        assert_eq!(money.major(), 49);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display_always_two_decimals() {
        assert_eq!(Money::from_cents(30000).to_string(), "300.00");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_plain_amounts() {
        assert_eq!(Money::parse("49.99").unwrap().cents(), 4999);
        assert_eq!(Money::parse("100").unwrap().cents(), 10000);
        assert_eq!(Money::parse("100.5").unwrap().cents(), 10050);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse(" 7.00 ").unwrap().cents(), 700);
        assert_eq!(Money::parse("-5.50").unwrap().cents(), -550);
    }

    #[test]
    fn test_parse_rounds_half_up() {
        assert_eq!(Money::parse("10.004").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.005").unwrap().cents(), 1001);
        assert_eq!(Money::parse("10.0049999").unwrap().cents(), 1000);
        assert_eq!(Money::parse("0.995").unwrap().cents(), 100);
        assert_eq!(Money::parse("-1.005").unwrap().cents(), -101);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("12,50").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(15000);
        let b = Money::from_cents(4999);

        assert_eq!((a + b).cents(), 19999);

        let total: Money = [a, b].iter().sum();
        assert_eq!(total.to_string(), "199.99");
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(10000);
        assert_eq!(unit_price.checked_multiply_quantity(3).unwrap().cents(), 30000);
        assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    }

    /// Float accumulation would drift here; integer cents never do.
    #[test]
    fn test_many_small_amounts_do_not_drift() {
        let dime = Money::parse("0.10").unwrap();
        let total: Money = std::iter::repeat(dime).take(1000).sum();
        assert_eq!(total.to_string(), "100.00");
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(4999)).unwrap();
        assert_eq!(json, "4999");
    }
}
