//! Promotional code resolution and persistence.
//!
//! A single flat-discount code exists. Codes are normalized (trimmed,
//! uppercased) before matching, so `" 7forever "` applies. The applied
//! code is persisted under its own storage key and survives restarts
//! until checkout completes or the shopper removes it.

use bloomcart_core::Money;
use tracing::debug;

use crate::storage::StateStore;

/// The one valid promotional code.
pub const PROMO_CODE: &str = "7FOREVER";

/// Flat discount granted by [`PROMO_CODE`].
pub const PROMO_DISCOUNT: Money = Money::from_rupees(20);

/// Storage key for the currently applied code.
pub const COUPON_STORAGE_KEY: &str = "couponCode";

/// Resolve a raw code to its discount, if valid.
#[must_use]
pub fn resolve(code: &str) -> Option<Money> {
    let normalized = code.trim().to_uppercase();
    (normalized == PROMO_CODE).then_some(PROMO_DISCOUNT)
}

/// Validate and persist a code. Returns the discount on success; invalid
/// codes are rejected without touching stored state.
pub fn apply(store: &dyn StateStore, code: &str) -> Option<Money> {
    let discount = resolve(code)?;
    store.write(COUPON_STORAGE_KEY, PROMO_CODE);
    debug!(code = PROMO_CODE, %discount, "Applied promotional code");
    Some(discount)
}

/// The discount for the persisted code, if one is stored and still valid.
#[must_use]
pub fn applied_discount(store: &dyn StateStore) -> Option<Money> {
    let stored = store.read(COUPON_STORAGE_KEY)?;
    resolve(&stored)
}

/// The persisted code itself, if valid.
#[must_use]
pub fn applied_code(store: &dyn StateStore) -> Option<String> {
    let stored = store.read(COUPON_STORAGE_KEY)?;
    resolve(&stored).map(|_| PROMO_CODE.to_string())
}

/// Remove any persisted code.
pub fn clear(store: &dyn StateStore) {
    store.remove(COUPON_STORAGE_KEY);
}
