//! Order assembly.
//!
//! Turns a checkout request and a snapshot of the referenced products into an
//! order ready to persist. Nothing here touches storage.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::domain::{
    checkout::{
        data::CheckoutRequest,
        errors::{CheckoutError, InvalidCheckout},
    },
    orders::{
        data::{NewOrder, NewOrderItem},
        records::{OrderItemUuid, OrderStatus, OrderUuid},
    },
    products::records::{ProductRecord, ProductUuid},
    users::records::UserUuid,
};

/// Stock to take from one product, summed over every line that references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub product: ProductUuid,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledOrder {
    pub order: NewOrder,

    /// One entry per distinct product, in ascending product id order.
    pub reservations: Vec<Reservation>,
}

/// Check the shape of a request before any product is read.
///
/// # Errors
///
/// Returns the first problem found: an empty cart, blank customer details, or a
/// line whose quantity is below one or beyond what stock can hold.
pub fn validate_request(request: &CheckoutRequest) -> Result<(), InvalidCheckout> {
    if request.items.is_empty() {
        return Err(InvalidCheckout::EmptyCart);
    }

    if request.customer_name.trim().is_empty() || request.customer_email.trim().is_empty() {
        return Err(InvalidCheckout::MissingCustomerDetails);
    }

    for line in &request.items {
        line_quantity(line.product_uuid, line.quantity)?;
    }

    Ok(())
}

fn line_quantity(product: ProductUuid, quantity: i64) -> Result<u32, InvalidCheckout> {
    if quantity < 1 {
        return Err(InvalidCheckout::QuantityBelowOne(product));
    }

    u32::try_from(quantity).map_err(|_too_large| InvalidCheckout::QuantityTooLarge(product))
}

/// Assemble an order from `request` against `snapshot`.
///
/// Archived products count as missing. Quantities of lines that share a product
/// are summed before the stock check. Every line becomes one order item, in request
/// order, priced from the snapshot.
///
/// # Errors
///
/// - [`CheckoutError::InvalidRequest`] for a malformed request or a total that
///   does not fit the store's money type.
/// - [`CheckoutError::ProductNotFound`] for the first line whose product is absent.
/// - [`CheckoutError::InsufficientStock`] for the first product whose stock does not
///   cover the requested quantity.
pub fn assemble(
    request: &CheckoutRequest,
    snapshot: &[ProductRecord],
    owner: UserUuid,
    order: OrderUuid,
) -> Result<AssembledOrder, CheckoutError> {
    validate_request(request)?;

    let catalog: FxHashMap<ProductUuid, &ProductRecord> = snapshot
        .iter()
        .filter(|product| product.is_active)
        .map(|product| (product.uuid, product))
        .collect();

    let mut lines = Vec::with_capacity(request.items.len());
    let mut requested: BTreeMap<ProductUuid, u32> = BTreeMap::new();

    for line in &request.items {
        let product = catalog
            .get(&line.product_uuid)
            .copied()
            .ok_or(CheckoutError::ProductNotFound(line.product_uuid))?;

        let units = line_quantity(line.product_uuid, line.quantity)?;
        let quantity = requested.entry(product.uuid).or_default();

        *quantity = quantity
            .checked_add(units)
            .ok_or(InvalidCheckout::QuantityTooLarge(product.uuid))?;

        lines.push((product, units));
    }

    for (product, _) in &lines {
        let wanted = requested.get(&product.uuid).copied().unwrap_or_default();

        if product.stock < wanted {
            return Err(CheckoutError::InsufficientStock {
                product: product.uuid,
                name: product.name.clone(),
                requested: wanted,
                available: product.stock,
            });
        }
    }

    let mut total_amount: u64 = 0;
    let mut items = Vec::with_capacity(lines.len());

    for (product, quantity) in lines {
        let extension = product
            .price
            .checked_mul(u64::from(quantity))
            .ok_or(InvalidCheckout::TotalOverflow)?;

        total_amount = total_amount
            .checked_add(extension)
            .ok_or(InvalidCheckout::TotalOverflow)?;

        items.push(NewOrderItem {
            uuid: OrderItemUuid::new(),
            product_uuid: product.uuid,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
        });
    }

    if i64::try_from(total_amount).is_err() {
        return Err(InvalidCheckout::TotalOverflow.into());
    }

    let reservations = requested
        .into_iter()
        .map(|(product, quantity)| Reservation { product, quantity })
        .collect();

    Ok(AssembledOrder {
        order: NewOrder {
            uuid: order,
            user_uuid: owner,
            customer_name: request.customer_name.trim().to_string(),
            customer_email: request.customer_email.trim().to_string(),
            total_amount,
            status: OrderStatus::Completed,
            items,
        },
        reservations,
    })
}
