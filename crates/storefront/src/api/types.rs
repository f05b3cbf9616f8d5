//! Wire types for the marketplace backend API.
//!
//! All payloads use camelCase field names on the wire. Deserialization
//! is tolerant where the backend has drifted between releases (the
//! payment-init `id`/`razorpayOrderId` spelling in particular).

use bloomcart_core::{FloristId, Money, OrderId, OrderStatus, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::models::OrderItem;
use crate::pricing::ShippingQuote;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub florist_id: Option<FloristId>,
}

impl From<&Product> for CartLine {
    /// A one-unit cart line snapshotting the product's current data.
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
            image_url: product.image_url.clone(),
            category: product.category.clone(),
            florist_id: product.florist_id,
        }
    }
}

/// One line of the server-side cart sync payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRef {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl From<&CartLine> for CartItemRef {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            quantity: line.quantity,
        }
    }
}

/// `POST /orders` payload.
///
/// The full form carries the explicit item snapshot; the address-only
/// form (no `cartItems`) asks the backend to build the order from its
/// own copy of the cart, and is the retry path when the full form is
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingQuote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_items: Option<Vec<OrderItem>>,
}

impl CreateOrderRequest {
    /// The address-only retry form of this request.
    #[must_use]
    pub fn address_only(&self) -> Self {
        Self {
            address: self.address.clone(),
            coupon_code: None,
            discount: None,
            shipping: None,
            cart_items: None,
        }
    }
}

/// An order as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendOrder {
    pub id: OrderId,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// `POST /payments/create-order` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInit {
    /// Processor-side order id. Older backend builds spell this `id`.
    #[serde(alias = "id")]
    pub razorpay_order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    /// Amount due in paise.
    pub amount: i64,
    pub currency: String,
}

/// `POST /payments/success` confirmation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSignature {
    /// The marketplace order being paid.
    pub order_id: OrderId,
    /// Processor payment id.
    pub razorpay_payment_id: String,
    /// Processor order id from [`PaymentInit`].
    pub razorpay_order_id: String,
    /// Processor HMAC over payment and order ids.
    pub razorpay_signature: String,
}
