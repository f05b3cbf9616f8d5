//! Command implementations.

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod shop;
