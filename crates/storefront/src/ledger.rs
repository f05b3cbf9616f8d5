//! Per-shopper local order ledger.
//!
//! Orders are stored newest-first as one JSON array per shopper under
//! `orders:<user>`. The ledger is append-and-update only; nothing ever
//! deletes an order. Missing or corrupt storage reads as an empty
//! ledger, and every mutation rewrites the full array (the arrays stay
//! small, one shopper's order history).

use std::sync::Arc;

use bloomcart_core::{OrderId, OrderStatus};
use tracing::{debug, instrument};

use crate::models::{Order, UserKey};
use crate::storage::{self, StateStore};

/// Local order ledger over the state store.
#[derive(Clone)]
pub struct OrderLedger {
    store: Arc<dyn StateStore>,
}

impl std::fmt::Debug for OrderLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderLedger").finish_non_exhaustive()
    }
}

impl OrderLedger {
    /// Create a ledger over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// All of a shopper's orders, newest first.
    #[must_use]
    pub fn list_for(&self, user: UserKey) -> Vec<Order> {
        storage::read_json(self.store.as_ref(), &user.orders_key()).unwrap_or_default()
    }

    /// One order by id.
    #[must_use]
    pub fn get(&self, user: UserKey, id: &OrderId) -> Option<Order> {
        self.list_for(user).into_iter().find(|order| &order.id == id)
    }

    /// Record a new order at the head of the shopper's list.
    #[instrument(skip(self, order), fields(order_id = %order.id, %user))]
    pub fn append(&self, user: UserKey, order: Order) {
        let mut orders = self.list_for(user);
        orders.insert(0, order);
        storage::write_json(self.store.as_ref(), &user.orders_key(), &orders);
        debug!("Recorded order locally");
    }

    /// Move an order to `status`.
    ///
    /// Returns `None` when the order does not exist. Orders already in a
    /// terminal status (and no-op transitions) come back unchanged, so a
    /// `Some` result is always the order's current state.
    #[instrument(skip(self), fields(%user))]
    pub fn update_status(
        &self,
        user: UserKey,
        id: &OrderId,
        status: OrderStatus,
    ) -> Option<Order> {
        let mut orders = self.list_for(user);
        let order = orders.iter_mut().find(|order| &order.id == id)?;
        if order.apply_status(status) {
            let updated = order.clone();
            storage::write_json(self.store.as_ref(), &user.orders_key(), &orders);
            debug!(order_id = %id, %status, "Updated local order status");
            Some(updated)
        } else {
            Some(order.clone())
        }
    }

    /// Advance an order exactly one step along the fulfillment chain.
    ///
    /// Terminal orders come back unchanged; unknown orders yield `None`.
    pub fn advance_status(&self, user: UserKey, id: &OrderId) -> Option<Order> {
        let current = self.get(user, id)?;
        match current.next_status() {
            Some(next) => self.update_status(user, id, next),
            None => Some(current),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{DeliveryAddress, OrderItem, PaymentRecord};
    use crate::pricing;
    use crate::storage::{FileStore, MemoryStore};
    use bloomcart_core::{Money, PaymentMethod, ProductId};

    fn ledger() -> OrderLedger {
        OrderLedger::new(Arc::new(MemoryStore::new()))
    }

    fn order(status_after_payment: PaymentRecord) -> Order {
        let quote = pricing::quote(Money::from_rupees(600), Money::ZERO);
        Order::new_local(
            vec![OrderItem {
                product_id: ProductId::new(1),
                name: "Red Rose Bouquet".to_string(),
                unit_price: Money::from_rupees(300),
                quantity: 2,
                image_url: None,
                florist_id: None,
            }],
            &quote,
            None,
            DeliveryAddress {
                full_name: "Asha Rao".to_string(),
                phone: "9876543210".to_string(),
                address_line: "12 Rose Lane".to_string(),
                city: "Bengaluru".to_string(),
                postal_code: "560001".to_string(),
            },
            status_after_payment,
        )
    }

    fn paid_order() -> Order {
        order(PaymentRecord::paid(PaymentMethod::Simulated))
    }

    #[test]
    fn test_append_keeps_newest_first() {
        let ledger = ledger();
        let first = paid_order();
        let second = paid_order();
        ledger.append(UserKey::Guest, first.clone());
        ledger.append(UserKey::Guest, second.clone());
        let orders = ledger.list_for(UserKey::Guest);
        assert_eq!(orders[0].id, second.id);
        assert_eq!(orders[1].id, first.id);
    }

    #[test]
    fn test_ledgers_are_partitioned_per_user() {
        let ledger = ledger();
        ledger.append(UserKey::Guest, paid_order());
        assert!(
            ledger
                .list_for(UserKey::User(bloomcart_core::UserId::new(1)))
                .is_empty()
        );
    }

    #[test]
    fn test_update_status_appends_history() {
        let ledger = ledger();
        let order = paid_order();
        let id = order.id.clone();
        ledger.append(UserKey::Guest, order);

        let updated = ledger
            .update_status(UserKey::Guest, &id, OrderStatus::Processing)
            .expect("order exists");
        assert_eq!(updated.status, OrderStatus::Processing);
        assert_eq!(updated.history.len(), 3);

        // The change is persisted, not just returned.
        let reread = ledger.get(UserKey::Guest, &id).expect("order exists");
        assert_eq!(reread.status, OrderStatus::Processing);
    }

    #[test]
    fn test_terminal_order_is_returned_unchanged() {
        let ledger = ledger();
        let order = paid_order();
        let id = order.id.clone();
        ledger.append(UserKey::Guest, order);
        ledger.update_status(UserKey::Guest, &id, OrderStatus::Delivered);

        let unchanged = ledger
            .update_status(UserKey::Guest, &id, OrderStatus::Cancelled)
            .expect("order exists");
        assert_eq!(unchanged.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_unknown_order_yields_none() {
        let ledger = ledger();
        assert!(
            ledger
                .update_status(UserKey::Guest, &OrderId::new("loc_missing"), OrderStatus::Paid)
                .is_none()
        );
        assert!(
            ledger
                .advance_status(UserKey::Guest, &OrderId::new("loc_missing"))
                .is_none()
        );
    }

    #[test]
    fn test_advance_walks_one_step_and_stops_at_terminal() {
        let ledger = ledger();
        let order = paid_order();
        let id = order.id.clone();
        ledger.append(UserKey::Guest, order);

        let mut seen = Vec::new();
        for _ in 0..6 {
            let order = ledger.advance_status(UserKey::Guest, &id).expect("order exists");
            seen.push(order.status);
        }
        assert_eq!(
            seen,
            vec![
                OrderStatus::Processing,
                OrderStatus::Shipped,
                OrderStatus::Delivered,
                OrderStatus::Delivered,
                OrderStatus::Delivered,
                OrderStatus::Delivered,
            ]
        );
    }

    #[test]
    fn test_ledger_round_trips_through_file_store() {
        let dir = tempfile::tempdir().expect("temp dir");
        let order = paid_order();
        let id = order.id.clone();
        {
            let store = Arc::new(FileStore::new(dir.path()).expect("file store"));
            OrderLedger::new(store).append(UserKey::Guest, order);
        }
        let store = Arc::new(FileStore::new(dir.path()).expect("file store"));
        let reloaded = OrderLedger::new(store);
        let orders = reloaded.list_for(UserKey::Guest);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, id);
        assert_eq!(orders[0].status, OrderStatus::Paid);
    }

    #[test]
    fn test_corrupt_ledger_reads_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.write("orders:guest", "{definitely not an array");
        let ledger = OrderLedger::new(store);
        assert!(ledger.list_for(UserKey::Guest).is_empty());
    }
}
