//! Order Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order lifecycle state. Checkout fulfils immediately, so `Completed` is terminal
/// and the only state an order is ever in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderStatus {
    #[default]
    Completed,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "completed" => Ok(Self::Completed),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

/// Order Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,

    /// Owning user. Not a foreign key, orders outlive their users.
    pub user_uuid: UserUuid,

    pub customer_name: String,
    pub customer_email: String,

    /// Sum of `unit_price * quantity` over `items`, in minor currency units.
    pub total_amount: u64,

    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub items: Vec<OrderItemRecord>,
}

/// Order Item Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,

    /// Current catalog name of the product.
    pub product_name: String,

    pub quantity: u32,

    /// Price snapshot taken at purchase time.
    pub unit_price: u64,
}

/// Admin dashboard figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total_products: u64,
    pub total_orders: u64,
    pub total_revenue: u64,

    /// Products with ten or fewer units left.
    pub low_stock_products: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_its_own_rendering() -> Result<(), UnknownOrderStatus> {
        let parsed: OrderStatus = OrderStatus::Completed.to_string().parse()?;

        assert_eq!(parsed, OrderStatus::Completed);

        Ok(())
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("refunded".parse::<OrderStatus>().is_err());
    }
}
