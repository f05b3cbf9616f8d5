//! Payment collection seam.
//!
//! The actual processor UI (the Razorpay widget, in production) is
//! rendered by whatever surface embeds this crate, so the gateway only
//! sees it as a [`PaymentCollector`]: given an initialized processor
//! order, eventually produce an outcome. When no collector is wired up
//! at all, checkout takes the offline path instead.

use async_trait::async_trait;

use crate::api::types::PaymentInit;

/// What came back from the processor UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The shopper paid; the processor issued these identifiers.
    Completed(ProcessorReceipt),
    /// The attempt failed or was dismissed.
    Failed { reason: String },
}

/// Identifiers the processor returns on a successful payment, used to
/// verify the payment with the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorReceipt {
    pub payment_id: String,
    pub processor_order_id: String,
    pub signature: String,
}

/// Drives the externally rendered processor UI for one payment.
#[async_trait]
pub trait PaymentCollector: Send + Sync {
    /// Present the payment UI for `init` and wait for the shopper.
    async fn collect(&self, init: &PaymentInit) -> PaymentOutcome;
}
