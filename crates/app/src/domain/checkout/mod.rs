//! Checkout

pub mod assembler;
pub mod data;
pub mod errors;
pub(crate) mod ledger;
pub mod service;

pub use errors::{CheckoutError, InvalidCheckout};
pub use service::*;
