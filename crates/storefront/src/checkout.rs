//! The order submission gateway.
//!
//! Checkout is a strictly ordered attempt sequence against collaborators
//! that may each be missing or broken:
//!
//! 1. **SyncCart** - push the cart to the backend (non-fatal).
//! 2. **CreateOrder** - full payload, then an address-only retry; both
//!    failing routes the purchase to the local fallback.
//! 3. **CreatePayment** - register the payment with the processor; an
//!    unavailable processor or missing key finalizes offline as paid.
//! 4. **FinalizePayment** - drive the payment collector and confirm the
//!    result with the backend. Processor failure yields a failed order;
//!    confirmation failure after a successful payment yields a pending
//!    payment and an explicit warning.
//! 5. **LocalFallback** - a fully local, simulated-paid order needing
//!    no backend at all.
//!
//! Whatever path is taken, finalize is uniform: the order lands in the
//! local ledger, the cart and coupon are cleared, and a paid order gets
//! its one-shot auto-delivery timer. The only hard errors are the two
//! validation failures; everything downstream degrades into a receipt
//! carrying a user-facing warning.

use std::sync::Arc;
use std::time::Duration;

use bloomcart_core::{OrderStatus, PaymentMethod, PaymentStatus};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::api::types::{CartItemRef, CreateOrderRequest, PaymentSignature};
use crate::api::{BackendOrder, CheckoutBackend};
use crate::error::CheckoutError;
use crate::ledger::OrderLedger;
use crate::models::{AppliedDiscount, DeliveryAddress, Order, PaymentRecord};
use crate::payment::{PaymentCollector, PaymentOutcome};
use crate::pricing;
use crate::session::ShopperSession;
use crate::simulator;

/// Warning when the backend never saw the order.
pub const WARN_BACKEND_UNAVAILABLE: &str =
    "Could not reach the marketplace. Your order was saved on this device with a simulated payment.";

/// Warning when the payment processor was unavailable or unconfigured.
pub const WARN_OFFLINE_PAYMENT: &str =
    "Payment processor unavailable. Order placed and marked paid offline.";

/// Warning when the processor reported a failed payment.
pub const WARN_PAYMENT_FAILED: &str = "Payment failed. The order was recorded but not paid.";

/// Warning when a completed payment could not be verified.
pub const WARN_VERIFICATION_PENDING: &str =
    "Payment completed but could not be verified with the marketplace yet.";

/// What a completed checkout hands back to the caller.
#[derive(Debug)]
pub struct CheckoutReceipt {
    /// The locally recorded order.
    pub order: Order,
    /// User-facing degradation notice, if any step fell back.
    pub warning: Option<String>,
    /// The auto-delivery timer, present when the order finalized paid.
    pub auto_delivery: Option<JoinHandle<()>>,
}

/// The order submission gateway.
pub struct CheckoutGateway<B> {
    backend: B,
    collector: Option<Arc<dyn PaymentCollector>>,
    ledger: OrderLedger,
    razorpay_key_id: Option<String>,
    auto_deliver_after: Duration,
}

impl<B> std::fmt::Debug for CheckoutGateway<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutGateway")
            .field("has_collector", &self.collector.is_some())
            .field("razorpay_key_id", &self.razorpay_key_id)
            .finish_non_exhaustive()
    }
}

impl<B: CheckoutBackend> CheckoutGateway<B> {
    /// Create a gateway without a payment collector (offline path).
    #[must_use]
    pub fn new(
        backend: B,
        ledger: OrderLedger,
        razorpay_key_id: Option<String>,
        auto_deliver_after: Duration,
    ) -> Self {
        Self {
            backend,
            collector: None,
            ledger,
            razorpay_key_id,
            auto_deliver_after,
        }
    }

    /// Attach the processor UI.
    #[must_use]
    pub fn with_collector(mut self, collector: Arc<dyn PaymentCollector>) -> Self {
        self.collector = Some(collector);
        self
    }

    /// Run the full checkout sequence for the session's cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` or
    /// `CheckoutError::IncompleteAddress` before any network call.
    /// Backend and payment failures never error; they degrade into the
    /// receipt's warning.
    #[instrument(skip(self, session, address), fields(user = %session.user()))]
    pub async fn place_order(
        &self,
        session: &mut ShopperSession,
        address: &DeliveryAddress,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if session.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let missing = address.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::IncompleteAddress(missing));
        }

        let items = session.cart().snapshot_items();
        let coupon_code = session.coupon_code();
        let quote = pricing::quote(session.cart().subtotal(), session.coupon_discount());
        let discount = coupon_code.as_ref().map(|code| AppliedDiscount {
            code: code.clone(),
            amount: quote.discount,
        });

        // Step 1: cart sync. Best effort; the order payload carries the
        // authoritative item snapshot anyway.
        let item_refs: Vec<CartItemRef> =
            session.cart().lines().iter().map(CartItemRef::from).collect();
        if let Err(e) = self.backend.sync_cart(&item_refs).await {
            warn!(error = %e, "Cart sync failed, continuing");
        }

        // Step 2: create the order on the backend.
        let request = CreateOrderRequest {
            address: address.summary(),
            coupon_code: coupon_code.clone(),
            discount: discount.as_ref().map(|d| d.amount),
            shipping: Some(quote.shipping),
            cart_items: Some(items.clone()),
        };
        let backend_order = self.create_backend_order(&request).await;

        // Steps 3-4: payment, or the appropriate degradation.
        let (payment, warning) = match &backend_order {
            Some(order) => self.collect_payment(order).await,
            None => (
                PaymentRecord::paid(PaymentMethod::Simulated)
                    .with_note("Backend unreachable; payment simulated"),
                Some(WARN_BACKEND_UNAVAILABLE.to_string()),
            ),
        };

        // Step 5: finalize locally, identically on every path.
        let order = Order::new_local(items, &quote, discount, address.clone(), payment);
        self.ledger.append(session.user(), order.clone());
        session.clear_cart();

        let auto_delivery = (order.status == OrderStatus::Paid).then(|| {
            simulator::schedule_auto_delivery(
                self.ledger.clone(),
                session.user(),
                order.id.clone(),
                self.auto_deliver_after,
            )
        });

        info!(
            order_id = %order.id,
            status = %order.status,
            total = %order.total,
            degraded = warning.is_some(),
            "Checkout finalized"
        );
        Ok(CheckoutReceipt {
            order,
            warning,
            auto_delivery,
        })
    }

    /// Full create, then the address-only retry.
    async fn create_backend_order(&self, request: &CreateOrderRequest) -> Option<BackendOrder> {
        match self.backend.create_order(request).await {
            Ok(order) => Some(order),
            Err(e) => {
                warn!(error = %e, "Order create failed, retrying address-only");
                match self.backend.create_order(&request.address_only()).await {
                    Ok(order) => Some(order),
                    Err(e) => {
                        warn!(error = %e, "Order create retry failed, falling back to local order");
                        None
                    }
                }
            }
        }
    }

    /// Initialize and drive the payment for a backend-known order.
    async fn collect_payment(&self, order: &BackendOrder) -> (PaymentRecord, Option<String>) {
        let offline = || {
            (
                PaymentRecord::paid(PaymentMethod::Offline)
                    .with_note("Processor unavailable; finalized offline"),
                Some(WARN_OFFLINE_PAYMENT.to_string()),
            )
        };

        let init = match self.backend.create_payment_order(&order.id).await {
            Ok(init) => init,
            Err(e) => {
                warn!(error = %e, "Payment init failed, finalizing offline");
                return offline();
            }
        };
        let has_key = init.key_id.is_some() || self.razorpay_key_id.is_some();
        let Some(collector) = self.collector.as_ref().filter(|_| has_key) else {
            return offline();
        };

        match collector.collect(&init).await {
            PaymentOutcome::Completed(receipt) => {
                let confirmation = PaymentSignature {
                    order_id: order.id.clone(),
                    razorpay_payment_id: receipt.payment_id,
                    razorpay_order_id: receipt.processor_order_id,
                    razorpay_signature: receipt.signature,
                };
                match self.backend.confirm_payment(&confirmation).await {
                    Ok(()) => (PaymentRecord::paid(PaymentMethod::Razorpay), None),
                    Err(e) => {
                        warn!(error = %e, "Payment verification failed");
                        (
                            PaymentRecord {
                                method: PaymentMethod::Razorpay,
                                status: PaymentStatus::Pending,
                                paid_at: None,
                                note: Some("Awaiting verification".to_string()),
                            },
                            Some(WARN_VERIFICATION_PENDING.to_string()),
                        )
                    }
                }
            }
            PaymentOutcome::Failed { reason } => {
                warn!(reason, "Payment collector reported failure");
                (
                    PaymentRecord {
                        method: PaymentMethod::Razorpay,
                        status: PaymentStatus::Failed,
                        paid_at: None,
                        note: Some(reason),
                    },
                    Some(WARN_PAYMENT_FAILED.to_string()),
                )
            }
        }
    }

    /// The ledger this gateway finalizes into.
    #[must_use]
    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }
}
