//! Deterministic computation of the amount charged.
//!
//! Pure functions of their inputs: cart subtotal, flat coupon discount,
//! and the shipping policy (free above a threshold, flat fee otherwise).
//!
//! The free-shipping threshold is evaluated against the POST-discount
//! subtotal, uniformly. The discount is clamped so the payable amount
//! never goes negative:
//!
//! ```text
//! discounted = max(0, subtotal - discount)
//! shipping   = 0 if discounted >= 500 else 50
//! total      = discounted + shipping
//! ```

use bloomcart_core::Money;
use serde::{Deserialize, Serialize};

/// Orders at or above this (post-discount) subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_rupees(500);

/// Flat delivery fee below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Money = Money::from_rupees(50);

/// How the shipping cost was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingKind {
    /// Subtotal reached the free-shipping threshold.
    Free,
    /// Flat fee applied.
    Flat,
}

/// Shipping cost descriptor, embedded in orders and sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingQuote {
    pub cost: Money,
    #[serde(rename = "type")]
    pub kind: ShippingKind,
    pub is_free: bool,
}

impl ShippingQuote {
    /// A free-shipping quote.
    #[must_use]
    pub const fn free() -> Self {
        Self {
            cost: Money::ZERO,
            kind: ShippingKind::Free,
            is_free: true,
        }
    }

    /// A flat-fee quote.
    #[must_use]
    pub const fn flat() -> Self {
        Self {
            cost: FLAT_SHIPPING_FEE,
            kind: ShippingKind::Flat,
            is_free: false,
        }
    }
}

/// The full price breakdown for a checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    /// Pre-discount sum of line totals.
    pub subtotal: Money,
    /// Discount actually applied (clamped to the subtotal).
    pub discount: Money,
    /// Subtotal after discount, never negative.
    pub discounted: Money,
    /// Shipping cost under the post-discount threshold rule.
    pub shipping: ShippingQuote,
    /// Final payable amount.
    pub total: Money,
}

/// Shipping for a given post-discount subtotal.
#[must_use]
pub fn shipping_for(discounted_subtotal: Money) -> ShippingQuote {
    if discounted_subtotal >= FREE_SHIPPING_THRESHOLD {
        ShippingQuote::free()
    } else {
        ShippingQuote::flat()
    }
}

/// Compute the payable total for a subtotal and flat discount.
#[must_use]
pub fn quote(subtotal: Money, discount: Money) -> PriceQuote {
    let discounted = subtotal.saturating_sub(discount);
    // The clamp means the effective discount can be smaller than asked.
    let applied_discount = subtotal.saturating_sub(discounted);
    let shipping = shipping_for(discounted);
    PriceQuote {
        subtotal,
        discount: applied_discount,
        discounted,
        shipping,
        total: discounted.add(shipping.cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtotal_at_threshold_ships_free() {
        // 300 x 2 = 600 >= 500, no coupon
        let q = quote(Money::from_rupees(600), Money::ZERO);
        assert!(q.shipping.is_free);
        assert_eq!(q.shipping.cost, Money::ZERO);
        assert_eq!(q.total, Money::from_rupees(600));
    }

    #[test]
    fn test_discounted_subtotal_below_threshold_pays_flat_fee() {
        // 100 x 2 = 200, coupon 20 -> 180 < 500 -> +50 shipping
        let q = quote(Money::from_rupees(200), Money::from_rupees(20));
        assert_eq!(q.discounted, Money::from_rupees(180));
        assert!(!q.shipping.is_free);
        assert_eq!(q.shipping.cost, FLAT_SHIPPING_FEE);
        assert_eq!(q.total, Money::from_rupees(230));
    }

    #[test]
    fn test_threshold_uses_post_discount_subtotal() {
        // 510 raw, 20 off -> 490 post-discount: flat fee applies even
        // though the raw subtotal clears the threshold.
        let q = quote(Money::from_rupees(510), Money::from_rupees(20));
        assert!(!q.shipping.is_free);
        assert_eq!(q.total, Money::from_rupees(540));

        // Exactly at the threshold after discount ships free.
        let q = quote(Money::from_rupees(520), Money::from_rupees(20));
        assert!(q.shipping.is_free);
        assert_eq!(q.total, Money::from_rupees(500));
    }

    #[test]
    fn test_total_never_negative() {
        let q = quote(Money::from_rupees(10), Money::from_rupees(9999));
        assert_eq!(q.discounted, Money::ZERO);
        assert_eq!(q.discount, Money::from_rupees(10));
        assert_eq!(q.total, FLAT_SHIPPING_FEE);
    }

    #[test]
    fn test_zero_subtotal() {
        let q = quote(Money::ZERO, Money::ZERO);
        assert_eq!(q.total, FLAT_SHIPPING_FEE);
        assert_eq!(q.discount, Money::ZERO);
    }
}
