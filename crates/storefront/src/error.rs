//! Unified error handling for the storefront core.
//!
//! Checkout deliberately converts backend and payment failures into
//! degraded-but-successful receipts (see [`crate::checkout`]); the error
//! types here cover the cases that genuinely stop an operation: client-side
//! validation, configuration problems, and backend calls made outside the
//! checkout fallback path (catalog browsing, order listing).

use thiserror::Error;

use crate::api::BackendError;
use crate::config::ConfigError;

/// Validation errors that stop checkout before any network call.
///
/// These are the only errors `place_order` returns; everything else is
/// degraded into a receipt with a warning. `Display` doubles as the
/// user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Checkout was attempted with no items in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// One or more required delivery fields are blank.
    #[error("Please fill all delivery details before paying")]
    IncompleteAddress(Vec<&'static str>),
}

impl CheckoutError {
    /// Names of the blank delivery fields, if any.
    #[must_use]
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::IncompleteAddress(fields) => fields,
            Self::EmptyCart => &[],
        }
    }
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend API operation failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Checkout validation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Local state directory could not be prepared.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Requested entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
