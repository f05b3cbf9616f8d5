//! Bloomcart Core - Shared types library.
//!
//! This crate provides common types used across all Bloomcart components:
//! - `storefront` - Client-side storefront core (cart, checkout, orders)
//! - `cli` - Command-line demo storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! storage access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money amounts, and
//!   order/payment statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
