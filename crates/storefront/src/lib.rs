//! Bloomcart Storefront - client-side checkout core for the florist
//! marketplace.
//!
//! This crate is the shopper-facing half of Bloomcart: it manages the
//! working cart, resolves the promotional code, computes payable totals,
//! and drives checkout against the marketplace backend. The backend is an
//! external collaborator and may be partially or entirely unavailable, so
//! every step of checkout degrades gracefully down to a purely local,
//! file-persisted order ledger with simulated fulfillment progress.
//!
//! # Architecture
//!
//! - [`cart`] / [`session`] - per-shopper cart lines and persisted session
//!   state (guests included)
//! - [`coupon`] - the single flat-discount promotional code
//! - [`pricing`] - pure total computation (discount clamp, shipping rule)
//! - [`api`] - REST client for the marketplace backend
//! - [`ledger`] - per-user local order ledger over the state store
//! - [`checkout`] - the order submission gateway state machine
//! - [`simulator`] - timer-driven fulfillment progress
//! - [`state`] - composition root wiring the above together
//!
//! # Example
//!
//! ```rust,ignore
//! use bloomcart_storefront::{config::StorefrontConfig, state::AppState};
//!
//! let config = StorefrontConfig::from_env()?;
//! let state = AppState::new(config)?;
//!
//! let mut session = state.session(None); // guest shopper
//! session.apply_coupon("7forever");
//!
//! let receipt = state
//!     .gateway()
//!     .place_order(&mut session, &address)
//!     .await?;
//! println!("order {} is {}", receipt.order.id, receipt.order.status);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod coupon;
pub mod error;
pub mod ledger;
pub mod models;
pub mod payment;
pub mod pricing;
pub mod session;
pub mod simulator;
pub mod state;
pub mod storage;

pub use checkout::{CheckoutGateway, CheckoutReceipt};
pub use error::{CheckoutError, StorefrontError};
pub use ledger::OrderLedger;
pub use models::{DeliveryAddress, Order, UserKey};
pub use session::ShopperSession;
pub use state::AppState;
