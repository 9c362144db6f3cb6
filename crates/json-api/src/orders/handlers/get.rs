//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use titan_app::domain::orders::records::{OrderItemRecord, OrderRecord};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,

    /// Product name at the time of reading; the price is the purchase-time snapshot
    pub product_name: String,

    pub quantity: u32,

    /// Unit price in cents when the order was placed
    pub unit_price: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub customer_name: String,
    pub customer_email: String,

    /// Order total in cents
    pub total_amount: u64,

    pub status: String,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            total_amount: order.total_amount,
            status: order.status.to_string(),
            created_at: order.created_at.to_string(),
            items: order.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Get Order Handler
///
/// Returns one of the caller's orders.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order", body = OrderResponse),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let order = state
        .app
        .orders
        .get_order(user, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
pub(crate) mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use titan_app::domain::{
        orders::{
            MockOrdersService, OrdersServiceError,
            records::{OrderItemUuid, OrderStatus, OrderUuid},
        },
        products::records::ProductUuid,
    };

    use crate::test_helpers::{TEST_USER_UUID, orders_service};

    use super::*;

    pub(crate) fn make_order(uuid: OrderUuid) -> OrderRecord {
        OrderRecord {
            uuid,
            user_uuid: TEST_USER_UUID,
            customer_name: "Sam Lifter".to_string(),
            customer_email: "sam@example.com".to_string(),
            total_amount: 3_000,
            status: OrderStatus::Completed,
            created_at: Timestamp::UNIX_EPOCH,
            items: vec![OrderItemRecord {
                uuid: OrderItemUuid::new(),
                order_uuid: uuid,
                product_uuid: ProductUuid::new(),
                product_name: "Titan Whey".to_string(),
                quantity: 3,
                unit_price: 1_000,
            }],
        }
    }

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_own_order() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid);

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |user, o| *user == TEST_USER_UUID && *o == uuid)
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.total_amount, 3_000);
        assert_eq!(body.status, "completed");
        assert_eq!(body.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_foreign_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
