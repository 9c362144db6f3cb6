//! Orders Data

use crate::domain::{
    orders::records::{OrderItemUuid, OrderStatus, OrderUuid},
    products::records::ProductUuid,
    users::records::UserUuid,
};

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub customer_name: String,
    pub customer_email: String,
    pub total_amount: u64,
    pub status: OrderStatus,
    pub items: Vec<NewOrderItem>,
}

/// New Order Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,

    /// Product name at purchase time, carried for the receipt.
    pub product_name: String,

    pub quantity: u32,
    pub unit_price: u64,
}
