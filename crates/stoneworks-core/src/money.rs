//! # Money Module
//!
//! Provides the `Money` type for monetary values in quotes.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    2.07 × 420 = 869.4000000000001  ❌                                   │
//! │                                                                         │
//! │  Quote lines multiply fractional quantities (m², lm) by rates, so      │
//! │  integer cents are not enough either: 1.8 m² × $65.50 = $117.90 but    │
//! │  0.27 m² × $65.50 = $17.685.                                           │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    2.07 × 420 = 869.40 exactly, and totals add up exactly.             │
//! │    Rounding to cents happens only for display (`rounded`).             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use stoneworks_core::money::Money;
//!
//! let rate = Money::new(Decimal::new(420, 0)); // $420/m²
//! let line = rate.times(Decimal::new(207, 2)); // 2.07 m²
//! assert_eq!(line.amount(), Decimal::new(8694, 1));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

/// Number of decimal places shown for currency amounts.
pub const CURRENCY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in AUD, stored exactly.
///
/// Serializes as a decimal string (`"869.4"`) so JSON round-trips are
/// lossless.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Whole-dollar amount, handy for rate tables.
    #[inline]
    pub fn from_dollars(dollars: i64) -> Self {
        Money(Decimal::from(dollars))
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Zero dollars.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies a unit price by a (possibly fractional) quantity.
    ///
    /// This is the only way a line total is produced, which keeps
    /// `total_price == quantity * unit_price` exact.
    #[inline]
    pub fn times(&self, quantity: Decimal) -> Money {
        Money(self.0 * quantity)
    }

    /// Tax on this amount at `rate`. Not rounded.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use stoneworks_core::money::Money;
    /// use stoneworks_core::types::TaxRate;
    ///
    /// let subtotal = Money::new(Decimal::new(17254, 1)); // $1725.40
    /// let gst = subtotal.calculate_tax(TaxRate::from_bps(1000));
    /// assert_eq!(gst.amount(), Decimal::new(17254, 2)); // $172.54
    /// ```
    #[inline]
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(self.0 * rate.fraction())
    }

    /// Rounds to cents using banker's rounding (round half to even).
    ///
    /// For presentation only: engine totals stay unrounded.
    pub fn rounded(&self) -> Money {
        Money(round_money(self.0, CURRENCY_DECIMALS))
    }
}

/// Round to `places` decimal places using banker's rounding.
///
/// ```rust
/// use rust_decimal::Decimal;
/// use stoneworks_core::money::round_money;
///
/// assert_eq!(round_money(Decimal::new(25, 1), 0), Decimal::new(2, 0));
/// assert_eq!(round_money(Decimal::new(35, 1), 0), Decimal::new(4, 0));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount rounded to cents, e.g. `$1897.94`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = round_money(self.0, CURRENCY_DECIMALS);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{}${:.2}", sign, rounded.abs())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_times_is_exact() {
        let rate = Money::new(dec!(420));
        assert_eq!(rate.times(dec!(2.07)).amount(), dec!(869.4));

        let rate = Money::new(dec!(65.5));
        assert_eq!(rate.times(dec!(0.27)).amount(), dec!(17.685));
    }

    #[test]
    fn test_tax_is_not_rounded() {
        let amount = Money::new(dec!(17.685));
        let tax = amount.calculate_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.amount(), dec!(1.7685));
    }

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Money::new(dec!(1897.94)).to_string(), "$1897.94");
        assert_eq!(Money::new(dec!(869.4)).to_string(), "$869.40");
        assert_eq!(Money::new(dec!(0.125)).to_string(), "$0.12");
        assert_eq!(Money::new(dec!(-5.5)).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_round_money_bankers() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(2.345), 2), dec!(2.34));
        assert_eq!(round_money(dec!(2.355), 2), dec!(2.36));
        assert_eq!(round_money(dec!(-2.5), 0), dec!(-2));
    }

    #[test]
    fn test_sum() {
        let items = vec![Money::new(dec!(869.4)), Money::new(dec!(468)), Money::new(dec!(153))];
        let total: Money = items.iter().sum();
        assert_eq!(total.amount(), dec!(1490.4));
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(dec!(869.40))).unwrap();
        assert_eq!(json, "\"869.40\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back.amount(), dec!(869.4));
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::new(dec!(-1)).is_negative());
        assert!(!Money::zero().is_negative());
        assert!(Money::zero().is_zero());
    }
}
