//! Checkout errors.

use thiserror::Error;

use crate::domain::{products::records::ProductUuid, users::UsersServiceError};

/// Ways a checkout request can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCheckout {
    #[error("Invalid request body")]
    UnreadableBody,

    #[error("No products in the cart")]
    EmptyCart,

    #[error("Name and email required")]
    MissingCustomerDetails,

    #[error("Quantity must be at least 1")]
    QuantityBelowOne(ProductUuid),

    #[error("Quantity is too large")]
    QuantityTooLarge(ProductUuid),

    #[error("Order total is too large")]
    TotalOverflow,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("You must be signed in to make a purchase")]
    Unauthorized,

    #[error("You must verify your email before making a purchase")]
    EmailNotVerified,

    #[error("{0}")]
    InvalidRequest(#[from] InvalidCheckout),

    #[error("Product not found")]
    ProductNotFound(ProductUuid),

    #[error("Insufficient stock for \"{name}\". Available: {available}")]
    InsufficientStock {
        product: ProductUuid,
        name: String,
        requested: u32,
        available: u32,
    },

    #[error("Error processing the order")]
    Persistence(#[source] sqlx::Error),

    #[error("Error processing the order")]
    Identity(#[source] UsersServiceError),
}

impl CheckoutError {
    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::EmailNotVerified => "email_not_verified",
            Self::InvalidRequest(_) => "invalid_request",
            Self::ProductNotFound(_) => "product_not_found",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::Persistence(_) | Self::Identity(_) => "persistence_failure",
        }
    }
}

impl From<sqlx::Error> for CheckoutError {
    fn from(error: sqlx::Error) -> Self {
        Self::Persistence(error)
    }
}
