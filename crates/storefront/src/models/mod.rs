//! Domain models persisted locally and exchanged with the backend.

pub mod address;
pub mod order;

pub use address::DeliveryAddress;
pub use order::{AppliedDiscount, Order, OrderItem, PaymentRecord, StatusChange};

use bloomcart_core::UserId;

/// Identity under which per-shopper state is keyed.
///
/// Guests get real carts and order ledgers too; their state lives under
/// the shared `guest` partition instead of a user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserKey {
    User(UserId),
    Guest,
}

impl UserKey {
    /// Storage key for this shopper's order ledger.
    #[must_use]
    pub fn orders_key(&self) -> String {
        format!("orders:{self}")
    }

    /// Storage key for this shopper's working cart.
    #[must_use]
    pub fn cart_key(&self) -> String {
        format!("cart:{self}")
    }
}

impl std::fmt::Display for UserKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "{id}"),
            Self::Guest => write!(f, "guest"),
        }
    }
}

impl From<Option<UserId>> for UserKey {
    fn from(id: Option<UserId>) -> Self {
        id.map_or(Self::Guest, Self::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key_storage_keys() {
        let guest = UserKey::Guest;
        assert_eq!(guest.orders_key(), "orders:guest");
        assert_eq!(guest.cart_key(), "cart:guest");

        let user = UserKey::User(UserId::new(42));
        assert_eq!(user.orders_key(), "orders:42");
        assert_eq!(user.cart_key(), "cart:42");
    }

    #[test]
    fn test_user_key_from_optional_id() {
        assert_eq!(UserKey::from(None), UserKey::Guest);
        assert_eq!(
            UserKey::from(Some(UserId::new(7))),
            UserKey::User(UserId::new(7))
        );
    }
}
