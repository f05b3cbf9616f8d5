//! Application state shared by every surface embedding the storefront.
//!
//! Wires the concrete pieces together once: configuration, the backend
//! client, the file-backed state store, and the order ledger over it.
//! Cheap to clone and hand to spawned tasks.

use std::sync::Arc;

use bloomcart_core::{OrderId, UserId};

use crate::api::BackendClient;
use crate::checkout::CheckoutGateway;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::ledger::OrderLedger;
use crate::models::UserKey;
use crate::session::ShopperSession;
use crate::simulator::{ProgressDriver, Tracker};
use crate::storage::{FileStore, StateStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    store: Arc<dyn StateStore>,
    ledger: OrderLedger,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state with a file store under the configured data dir.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let store: Arc<dyn StateStore> = Arc::new(FileStore::new(&config.data_dir)?);
        Ok(Self::with_store(config, store))
    }

    /// Build state over an explicit store (tests use an in-memory one).
    #[must_use]
    pub fn with_store(config: StorefrontConfig, store: Arc<dyn StateStore>) -> Self {
        let backend = BackendClient::new(&config);
        let ledger = OrderLedger::new(Arc::clone(&store));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                store,
                ledger,
            }),
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The backend API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// The local order ledger.
    #[must_use]
    pub fn ledger(&self) -> OrderLedger {
        self.inner.ledger.clone()
    }

    /// Open a session for a shopper (or a guest).
    #[must_use]
    pub fn session(&self, user: Option<UserId>) -> ShopperSession {
        ShopperSession::open(UserKey::from(user), Arc::clone(&self.inner.store))
    }

    /// An order submission gateway over the shared backend and ledger.
    ///
    /// Comes without a payment collector; attach one with
    /// [`CheckoutGateway::with_collector`] when a processor UI exists.
    #[must_use]
    pub fn gateway(&self) -> CheckoutGateway<BackendClient> {
        CheckoutGateway::new(
            self.inner.backend.clone(),
            self.ledger(),
            self.inner.config.razorpay_key_id.clone(),
            self.inner.config.auto_deliver_after,
        )
    }

    /// Start tracking an order at the configured tick.
    pub async fn track(&self, user: UserKey, id: OrderId) -> Tracker {
        let driver = ProgressDriver::select(self.inner.backend.clone(), &id).await;
        Tracker::start(
            driver,
            self.ledger(),
            user,
            id,
            self.inner.config.tracking_tick,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_sessions_share_the_store() {
        let state = AppState::with_store(
            StorefrontConfig::for_data_dir("/tmp/bloomcart-test"),
            Arc::new(MemoryStore::new()),
        );
        let mut session = state.session(None);
        session.apply_coupon("7FOREVER");
        let other = state.session(None);
        assert_eq!(other.coupon_code(), Some("7FOREVER".to_string()));
    }
}
