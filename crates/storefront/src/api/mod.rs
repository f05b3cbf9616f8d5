//! Marketplace backend REST client.
//!
//! # Architecture
//!
//! - Plain JSON-over-REST via `reqwest`; the base URL comes from config
//! - The backend is optional at runtime: checkout degrades to a local
//!   order when any call here fails, so errors carry enough detail for
//!   logs but never enough ceremony to stop a purchase
//! - Catalog responses are cached in-memory via `moka` (5 minute TTL)
//!
//! The [`CheckoutBackend`] trait is the seam the order-submission
//! gateway talks through; [`BackendClient`] is the production
//! implementation and tests substitute a fake.

mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{
    BackendOrder, CartItemRef, CreateOrderRequest, PaymentInit, PaymentSignature, Product,
};

use async_trait::async_trait;
use bloomcart_core::OrderId;
use thiserror::Error;

/// Errors from backend API calls.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// The backend operations checkout depends on.
///
/// Every method may fail at any time; callers decide whether a failure
/// is fatal (it never is during checkout) or degrades to local state.
#[async_trait]
pub trait CheckoutBackend: Send + Sync {
    /// Replace the server-side cart with `items`.
    async fn sync_cart(&self, items: &[CartItemRef]) -> Result<(), BackendError>;

    /// Create an order from the request payload.
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<BackendOrder, BackendError>;

    /// Register a payment attempt for an order with the processor.
    async fn create_payment_order(&self, order_id: &OrderId)
    -> Result<PaymentInit, BackendError>;

    /// Confirm a completed processor payment.
    async fn confirm_payment(&self, confirmation: &PaymentSignature)
    -> Result<(), BackendError>;

    /// All orders visible to the current shopper.
    async fn list_orders(&self) -> Result<Vec<BackendOrder>, BackendError>;

    /// One order by id.
    async fn get_order(&self, id: &OrderId) -> Result<BackendOrder, BackendError>;

    /// Ask the backend to move an order one step along its fulfillment
    /// chain, returning the updated order.
    async fn advance_order_status(&self, id: &OrderId) -> Result<BackendOrder, BackendError>;
}
