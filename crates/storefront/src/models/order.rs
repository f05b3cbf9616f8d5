//! Order records as stored in the local ledger.
//!
//! Every completed checkout produces one of these locally, whether or
//! not the backend also recorded the order. The JSON shape is stable
//! (camelCase keys) because it is persisted through the state store and
//! read back across sessions.

use bloomcart_core::{
    FloristId, Money, OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::DeliveryAddress;
use crate::pricing::{PriceQuote, ShippingQuote};

/// One purchased line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the time of purchase.
    #[serde(alias = "price")]
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub florist_id: Option<FloristId>,
}

impl OrderItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// The promotional discount applied to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    pub code: String,
    pub amount: Money,
}

/// How (and whether) the order was paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    /// Human-readable note for degraded outcomes (offline finalize,
    /// unverified payment).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PaymentRecord {
    /// A successful payment via `method`, timestamped now.
    #[must_use]
    pub fn paid(method: PaymentMethod) -> Self {
        Self {
            method,
            status: PaymentStatus::Paid,
            paid_at: Some(Utc::now()),
            note: None,
        }
    }

    /// Attach a note to the record.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// One entry in an order's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: OrderStatus,
    pub at: DateTime<Utc>,
}

/// A locally recorded order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    /// Pre-discount sum of line totals.
    #[serde(alias = "subtotal")]
    pub raw_total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<AppliedDiscount>,
    pub shipping: ShippingQuote,
    pub total: Money,
    pub address: DeliveryAddress,
    pub payment: PaymentRecord,
    /// Status transitions in the order they happened, oldest first.
    pub history: Vec<StatusChange>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a local order from the checkout inputs.
    ///
    /// The initial order status follows the payment outcome: a paid
    /// payment yields a `PAID` order (history records both `CREATED`
    /// and `PAID`), a failed one a terminal `FAILED` order, and a
    /// pending one stays `CREATED` until payment is confirmed.
    #[must_use]
    pub fn new_local(
        items: Vec<OrderItem>,
        quote: &PriceQuote,
        discount: Option<AppliedDiscount>,
        address: DeliveryAddress,
        payment: PaymentRecord,
    ) -> Self {
        let now = Utc::now();
        let status = match payment.status {
            PaymentStatus::Paid => OrderStatus::Paid,
            PaymentStatus::Failed => OrderStatus::Failed,
            PaymentStatus::Pending => OrderStatus::Created,
        };
        let mut history = vec![StatusChange {
            status: OrderStatus::Created,
            at: now,
        }];
        if status != OrderStatus::Created {
            history.push(StatusChange { status, at: now });
        }
        Self {
            id: OrderId::generate_local(),
            status,
            items,
            raw_total: quote.subtotal,
            discount,
            shipping: quote.shipping,
            total: quote.total,
            address,
            payment,
            history,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the order to `status`, recording the transition.
    ///
    /// Returns `false` without changing anything when the order is
    /// already in a terminal status or already in `status`.
    pub fn apply_status(&mut self, status: OrderStatus) -> bool {
        if self.status.is_terminal() || self.status == status {
            return false;
        }
        let now = Utc::now();
        self.status = status;
        self.history.push(StatusChange { status, at: now });
        self.updated_at = now;
        true
    }

    /// The next status in the fulfillment chain, if any.
    #[must_use]
    pub fn next_status(&self) -> Option<OrderStatus> {
        self.status.next()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pricing;

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            full_name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            address_line: "12 Rose Lane".to_string(),
            city: "Bengaluru".to_string(),
            postal_code: "560001".to_string(),
        }
    }

    fn items() -> Vec<OrderItem> {
        vec![OrderItem {
            product_id: ProductId::new(1),
            name: "Red Rose Bouquet".to_string(),
            unit_price: Money::from_rupees(300),
            quantity: 2,
            image_url: None,
            florist_id: Some(FloristId::new(11)),
        }]
    }

    #[test]
    fn test_paid_order_records_created_then_paid() {
        let quote = pricing::quote(Money::from_rupees(600), Money::ZERO);
        let order = Order::new_local(
            items(),
            &quote,
            None,
            address(),
            PaymentRecord::paid(PaymentMethod::Razorpay),
        );
        assert!(order.id.is_local());
        assert_eq!(order.status, OrderStatus::Paid);
        let history: Vec<OrderStatus> = order.history.iter().map(|h| h.status).collect();
        assert_eq!(history, vec![OrderStatus::Created, OrderStatus::Paid]);
    }

    #[test]
    fn test_pending_payment_keeps_order_created() {
        let quote = pricing::quote(Money::from_rupees(600), Money::ZERO);
        let payment = PaymentRecord {
            method: PaymentMethod::Razorpay,
            status: PaymentStatus::Pending,
            paid_at: None,
            note: None,
        };
        let order = Order::new_local(items(), &quote, None, address(), payment);
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.history.len(), 1);
    }

    #[test]
    fn test_failed_payment_yields_terminal_order() {
        let quote = pricing::quote(Money::from_rupees(600), Money::ZERO);
        let payment = PaymentRecord {
            method: PaymentMethod::Razorpay,
            status: PaymentStatus::Failed,
            paid_at: None,
            note: None,
        };
        let mut order = Order::new_local(items(), &quote, None, address(), payment);
        assert_eq!(order.status, OrderStatus::Failed);
        assert!(!order.apply_status(OrderStatus::Paid));
        assert_eq!(order.status, OrderStatus::Failed);
    }

    #[test]
    fn test_apply_status_appends_history_and_bumps_updated_at() {
        let quote = pricing::quote(Money::from_rupees(600), Money::ZERO);
        let mut order = Order::new_local(
            items(),
            &quote,
            None,
            address(),
            PaymentRecord::paid(PaymentMethod::Offline),
        );
        assert!(order.apply_status(OrderStatus::Processing));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.history.len(), 3);
        assert!(order.updated_at >= order.created_at);
        // Re-applying the current status is a no-op.
        assert!(!order.apply_status(OrderStatus::Processing));
        assert_eq!(order.history.len(), 3);
    }

    #[test]
    fn test_order_json_shape_is_camel_case() {
        let quote = pricing::quote(Money::from_rupees(600), Money::ZERO);
        let order = Order::new_local(
            items(),
            &quote,
            Some(AppliedDiscount {
                code: "7FOREVER".to_string(),
                amount: Money::from_rupees(20),
            }),
            address(),
            PaymentRecord::paid(PaymentMethod::Simulated),
        );
        let json = serde_json::to_value(&order).expect("serialize");
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["items"][0]["productId"], 1);
        assert_eq!(json["payment"]["status"], "PAID");
        assert_eq!(json["shipping"]["isFree"], true);
    }
}
