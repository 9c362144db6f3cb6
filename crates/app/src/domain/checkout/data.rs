//! Checkout Data

use crate::domain::products::records::ProductUuid;

/// A purchase request as submitted by the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutLine>,
    pub customer_name: String,
    pub customer_email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutLine {
    pub product_uuid: ProductUuid,

    /// Units as submitted. Checked only once the buyer may purchase, so
    /// a bad quantity never hides an identity problem.
    pub quantity: i64,
}
