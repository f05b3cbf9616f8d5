//! Timer-driven order fulfillment progress.
//!
//! Two timers exist. A one-shot jump marks a freshly paid order
//! delivered after a short delay (the marketplace has no real
//! fulfillment pipeline to wait for). A recurring [`Tracker`] advances
//! an order one step per tick while a tracking view is open, stopping
//! at terminal states and aborting its task when dropped.
//!
//! Progress is either server-driven (the backend's `advance-status`
//! endpoint, mirrored into the local ledger) or purely simulated
//! against the ledger. The choice is a single capability probe when
//! tracking starts; a server that disappears mid-track degrades to
//! local simulation per tick rather than stalling the view.

use std::time::Duration;

use bloomcart_core::{OrderId, OrderStatus};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::api::CheckoutBackend;
use crate::ledger::OrderLedger;
use crate::models::{Order, UserKey};

/// Mark `id` delivered after `delay`.
///
/// Scheduled once per paid checkout. The update goes through the
/// ledger, so it is a no-op if the order reached a terminal status by
/// other means first.
#[must_use]
pub fn schedule_auto_delivery(
    ledger: OrderLedger,
    user: UserKey,
    id: OrderId,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Some(order) = ledger.update_status(user, &id, OrderStatus::Delivered) {
            debug!(order_id = %id, status = %order.status, "Auto-delivery timer fired");
        } else {
            warn!(order_id = %id, "Auto-delivery timer fired for unknown order");
        }
    })
}

/// How tracking advances an order.
#[derive(Debug)]
pub enum ProgressDriver<B> {
    /// The backend drives status; local state mirrors it.
    Server(B),
    /// Local ledger only.
    Simulated,
}

impl<B: CheckoutBackend> ProgressDriver<B> {
    /// Probe whether the backend knows this order and pick a driver.
    ///
    /// Local (`loc_`) orders never ask the backend.
    pub async fn select(backend: B, id: &OrderId) -> Self {
        if id.is_local() {
            return Self::Simulated;
        }
        match backend.get_order(id).await {
            Ok(_) => Self::Server(backend),
            Err(e) => {
                debug!(order_id = %id, error = %e, "Backend unavailable, simulating progress");
                Self::Simulated
            }
        }
    }

    /// Advance the order one step, returning its current state.
    ///
    /// `None` means the order is unknown both to the backend and to the
    /// local ledger.
    #[instrument(skip(self, ledger), fields(%user))]
    pub async fn advance(
        &self,
        ledger: &OrderLedger,
        user: UserKey,
        id: &OrderId,
    ) -> Option<Order> {
        match self {
            Self::Server(backend) => match backend.advance_order_status(id).await {
                Ok(remote) => {
                    // Mirror the server's view locally if we have a copy.
                    ledger
                        .update_status(user, id, remote.status)
                        .or_else(|| ledger.get(user, id))
                }
                Err(e) => {
                    warn!(order_id = %id, error = %e, "Server advance failed, falling back to local");
                    ledger.advance_status(user, id)
                }
            },
            Self::Simulated => ledger.advance_status(user, id),
        }
    }
}

/// A running tracking timer.
///
/// Advances its order once per tick until the order reaches a terminal
/// status or disappears. Dropping the tracker aborts the task, so an
/// abandoned tracking view leaks nothing.
#[derive(Debug)]
pub struct Tracker {
    handle: Option<JoinHandle<()>>,
}

impl Tracker {
    /// Start tracking `id`, ticking every `tick`.
    ///
    /// The first advance happens one full tick after start.
    pub fn start<B>(
        driver: ProgressDriver<B>,
        ledger: OrderLedger,
        user: UserKey,
        id: OrderId,
        tick: Duration,
    ) -> Self
    where
        B: CheckoutBackend + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // The first interval tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                match driver.advance(&ledger, user, &id).await {
                    Some(order) if order.status.is_terminal() => {
                        debug!(order_id = %id, status = %order.status, "Tracking reached terminal status");
                        break;
                    }
                    Some(_) => {}
                    None => {
                        warn!(order_id = %id, "Tracked order disappeared");
                        break;
                    }
                }
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Whether the tracking task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the tracker to reach a terminal status.
    pub async fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
