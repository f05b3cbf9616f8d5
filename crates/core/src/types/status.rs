//! Order and payment status enums.
//!
//! Order fulfillment follows a fixed linear chain with two side-exit
//! terminal states:
//!
//! ```text
//! CREATED -> PAID -> PROCESSING -> SHIPPED -> DELIVERED
//!                \-> CANCELLED / FAILED (reachable only explicitly)
//! ```
//!
//! The wire and storage representation is SCREAMING_SNAKE_CASE, matching
//! the backend's status strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order fulfillment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Created,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Failed,
}

impl OrderStatus {
    /// All statuses, in progression order with the terminal side-exits last.
    pub const ALL: [Self; 7] = [
        Self::Created,
        Self::Paid,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Failed,
    ];

    /// Whether no further transition is permitted from this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Failed)
    }

    /// The next status along the linear fulfillment chain, if any.
    ///
    /// Terminal states have no successor. `CANCELLED` and `FAILED` are
    /// never produced here; they are only reachable by explicit updates.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::Paid),
            Self::Paid => Some(Self::Processing),
            Self::Processing => Some(Self::Shipped),
            Self::Shipped => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled | Self::Failed => None,
        }
    }

    /// The status name as it appears on the wire (e.g. `"PROCESSING"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Paid => "PAID",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, Error)]
#[error("unknown order status: {0}")]
pub struct ParseStatusError(String);

impl std::str::FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(Self::Created),
            "PAID" => Ok(Self::Paid),
            "PROCESSING" => Ok(Self::Processing),
            "SHIPPED" => Ok(Self::Shipped),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            "FAILED" => Ok(Self::Failed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Payment settlement status, recorded on the order's payment.
///
/// `Pending` marks the verification-failure case: the processor reported
/// success but the backend confirmation failed, so money may have moved.
/// It requires manual reconciliation and is never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
}

/// How the payment was (or was not) collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Collected through the Razorpay widget.
    Razorpay,
    /// Finalized as paid without opening the widget (script or key missing).
    Offline,
    /// Purely local fallback order; no processor involved.
    Simulated,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_linear_chain_advances_one_step() {
        assert_eq!(OrderStatus::Created.next(), Some(OrderStatus::Paid));
        assert_eq!(OrderStatus::Paid.next(), Some(OrderStatus::Processing));
        assert_eq!(OrderStatus::Processing.next(), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::Shipped.next(), Some(OrderStatus::Delivered));
    }

    #[test]
    fn test_terminal_states_have_no_successor() {
        for status in [
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Failed,
        ] {
            assert!(status.is_terminal());
            assert_eq!(status.next(), None);
        }
    }

    #[test]
    fn test_chain_never_skips_a_step() {
        // Walking next() from CREATED visits every non-terminal stage once.
        let mut walked = vec![OrderStatus::Created];
        while let Some(next) = walked.last().and_then(OrderStatus::next) {
            walked.push(next);
        }
        assert_eq!(
            walked,
            vec![
                OrderStatus::Created,
                OrderStatus::Paid,
                OrderStatus::Processing,
                OrderStatus::Shipped,
                OrderStatus::Delivered,
            ]
        );
    }

    #[test]
    fn test_wire_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_str(status.as_str()).ok(), Some(status));
        }
        assert!(OrderStatus::from_str("REFUNDED").is_err());
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"PROCESSING\"");
        let method = serde_json::to_string(&PaymentMethod::Simulated).unwrap();
        assert_eq!(method, "\"SIMULATED\"");
    }
}
