//! Per-shopper session: the working cart plus the applied coupon,
//! persisted through the state store on every mutation.
//!
//! A session is cheap to construct; it loads the persisted cart for its
//! shopper on creation and writes it back after each change, so two
//! sessions for the same shopper see each other's changes on reload
//! (last write wins, as with the storage layer generally).

use std::sync::Arc;

use bloomcart_core::{Money, ProductId};
use tracing::debug;

use crate::cart::{Cart, CartLine};
use crate::coupon;
use crate::models::UserKey;
use crate::storage::{self, StateStore};

/// A shopper's live session state.
pub struct ShopperSession {
    user: UserKey,
    store: Arc<dyn StateStore>,
    cart: Cart,
}

impl std::fmt::Debug for ShopperSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopperSession")
            .field("user", &self.user)
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl ShopperSession {
    /// Open the session for `user`, loading any persisted cart.
    #[must_use]
    pub fn open(user: UserKey, store: Arc<dyn StateStore>) -> Self {
        let cart = storage::read_json(store.as_ref(), &user.cart_key()).unwrap_or_default();
        Self { user, store, cart }
    }

    /// The shopper this session belongs to.
    #[must_use]
    pub fn user(&self) -> UserKey {
        self.user
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    fn persist_cart(&self) {
        storage::write_json(self.store.as_ref(), &self.user.cart_key(), &self.cart);
    }

    // =========================================================================
    // Cart mutations
    // =========================================================================

    /// Add a line to the cart and persist it.
    pub fn add_line(&mut self, line: CartLine) {
        debug!(user = %self.user, product = %line.product_id, qty = line.quantity, "Adding to cart");
        self.cart.add(line);
        self.persist_cart();
    }

    /// Set a line's quantity (zero or below removes it) and persist.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        let changed = self.cart.update_quantity(product_id, quantity);
        if changed {
            self.persist_cart();
        }
        changed
    }

    /// Remove a line and persist.
    pub fn remove_line(&mut self, product_id: ProductId) -> bool {
        let removed = self.cart.remove(product_id);
        if removed {
            self.persist_cart();
        }
        removed
    }

    /// Empty the cart and drop any applied coupon.
    ///
    /// Used after a completed checkout and by the explicit clear action;
    /// in both cases a leftover coupon would silently discount the next,
    /// unrelated order.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.store.remove(&self.user.cart_key());
        coupon::clear(self.store.as_ref());
    }

    // =========================================================================
    // Coupon
    // =========================================================================

    /// Validate and apply a promotional code.
    pub fn apply_coupon(&mut self, code: &str) -> Option<Money> {
        coupon::apply(self.store.as_ref(), code)
    }

    /// Remove the applied code, if any.
    pub fn remove_coupon(&mut self) {
        coupon::clear(self.store.as_ref());
    }

    /// Discount currently in effect for this session.
    #[must_use]
    pub fn coupon_discount(&self) -> Money {
        coupon::applied_discount(self.store.as_ref()).unwrap_or(Money::ZERO)
    }

    /// The applied code, if any.
    #[must_use]
    pub fn coupon_code(&self) -> Option<String> {
        coupon::applied_code(self.store.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn line(id: i64, price: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: Money::from_rupees(price),
            quantity,
            image_url: None,
            category: None,
            florist_id: None,
        }
    }

    #[test]
    fn test_cart_survives_session_reload() {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let mut session = ShopperSession::open(UserKey::Guest, Arc::clone(&store));
        session.add_line(line(1, 300, 2));

        let reloaded = ShopperSession::open(UserKey::Guest, store);
        assert_eq!(reloaded.cart().item_count(), 2);
        assert_eq!(reloaded.cart().subtotal(), Money::from_rupees(600));
    }

    #[test]
    fn test_users_and_guests_have_separate_carts() {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let mut guest = ShopperSession::open(UserKey::Guest, Arc::clone(&store));
        guest.add_line(line(1, 100, 1));

        let user = ShopperSession::open(
            UserKey::User(bloomcart_core::UserId::new(7)),
            Arc::clone(&store),
        );
        assert!(user.cart().is_empty());
    }

    #[test]
    fn test_clear_cart_also_drops_coupon() {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let mut session = ShopperSession::open(UserKey::Guest, Arc::clone(&store));
        session.add_line(line(1, 300, 1));
        session.apply_coupon("7FOREVER");
        assert_eq!(session.coupon_discount(), Money::from_rupees(20));

        session.clear_cart();
        assert!(session.cart().is_empty());
        assert_eq!(session.coupon_discount(), Money::ZERO);
        assert_eq!(store.read("cart:guest"), None);
    }

    #[test]
    fn test_invalid_coupon_is_rejected() {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let mut session = ShopperSession::open(UserKey::Guest, store);
        assert_eq!(session.apply_coupon("NOPE"), None);
        assert_eq!(session.coupon_code(), None);
    }

    #[test]
    fn test_update_and_remove_persist() {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let mut session = ShopperSession::open(UserKey::Guest, Arc::clone(&store));
        session.add_line(line(1, 100, 3));
        session.add_line(line(2, 200, 1));
        assert!(session.update_quantity(ProductId::new(1), 1));
        assert!(session.remove_line(ProductId::new(2)));

        let reloaded = ShopperSession::open(UserKey::Guest, store);
        assert_eq!(reloaded.cart().lines().len(), 1);
        assert_eq!(reloaded.cart().item_count(), 1);
    }
}
