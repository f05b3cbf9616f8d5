//! Monetary amounts using decimal arithmetic.
//!
//! All storefront prices are Indian rupees, so [`Money`] carries only the
//! amount. Arithmetic that could take a total below zero is expressed as
//! saturating subtraction; pricing rules clamp at zero rather than ever
//! producing a negative amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A rupee amount.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal value.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from whole rupees.
    #[must_use]
    pub const fn from_rupees(rupees: i64) -> Self {
        Self::from_scaled(rupees, 0)
    }

    /// Create an amount from paise (hundredths of a rupee).
    #[must_use]
    pub const fn from_paise(paise: i64) -> Self {
        Self::from_scaled(paise, 2)
    }

    // `Decimal::from_parts` is the only const constructor, so split the
    // magnitude into its 32-bit halves by hand.
    #[allow(clippy::cast_possible_truncation)]
    const fn from_scaled(units: i64, scale: u32) -> Self {
        let negative = units < 0;
        let magnitude = units.unsigned_abs();
        Self(Decimal::from_parts(
            magnitude as u32,
            (magnitude >> 32) as u32,
            0,
            negative,
            scale,
        ))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount in paise, rounded to the nearest paisa.
    ///
    /// Payment processors take amounts in the smallest currency unit.
    #[must_use]
    pub fn as_paise(&self) -> i64 {
        use rust_decimal::prelude::ToPrimitive;
        (self.0 * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .unwrap_or(0)
    }

    /// Add another amount.
    #[must_use]
    pub fn add(&self, other: Self) -> Self {
        Self(self.0 + other.0)
    }

    /// Subtract, clamping at zero instead of going negative.
    #[must_use]
    pub fn saturating_sub(&self, other: Self) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }

    /// Multiply by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₹{:.2}", self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc.add(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupees_display() {
        assert_eq!(Money::from_rupees(500).to_string(), "₹500.00");
        assert_eq!(Money::from_paise(2050).to_string(), "₹20.50");
    }

    #[test]
    fn test_constructors_work_in_const_context() {
        const THRESHOLD: Money = Money::from_rupees(500);
        const FEE: Money = Money::from_paise(50_000);
        const REFUND: Money = Money::from_rupees(-20);
        assert_eq!(THRESHOLD, FEE);
        assert_eq!(THRESHOLD.amount(), Decimal::new(500, 0));
        assert_eq!(REFUND.amount(), Decimal::new(-20, 0));
    }

    #[test]
    fn test_saturating_sub_clamps_at_zero() {
        let small = Money::from_rupees(10);
        let big = Money::from_rupees(20);
        assert_eq!(small.saturating_sub(big), Money::ZERO);
        assert_eq!(big.saturating_sub(small), Money::from_rupees(10));
        assert_eq!(big.saturating_sub(big), Money::ZERO);
    }

    #[test]
    fn test_times_and_sum() {
        let line = Money::from_rupees(300).times(2);
        assert_eq!(line, Money::from_rupees(600));

        let total: Money = [Money::from_rupees(100), Money::from_paise(50)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_paise(10050));
    }

    #[test]
    fn test_as_paise() {
        assert_eq!(Money::from_rupees(230).as_paise(), 23000);
        assert_eq!(Money::from_paise(99).as_paise(), 99);
    }

    #[test]
    fn test_ordering() {
        assert!(Money::from_rupees(500) > Money::from_rupees(499));
        assert!(Money::ZERO < Money::from_paise(1));
    }
}
