//! Checkout Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use titan_app::domain::checkout::{
    CheckoutError, InvalidCheckout,
    data::{CheckoutLine, CheckoutRequest},
};

use crate::{
    checkout::errors::{log_failure, status_code},
    extensions::*,
    observability::observe_checkout,
    state::State,
};

/// A line of the cart being purchased
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutItemPayload {
    /// Product to buy
    pub product_id: Uuid,

    /// Units to buy, at least 1
    pub quantity: i64,
}

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutPayload {
    #[serde(default)]
    pub items: Vec<CheckoutItemPayload>,

    #[serde(default)]
    pub customer_name: String,

    #[serde(default)]
    pub customer_email: String,
}

impl From<CheckoutPayload> for CheckoutRequest {
    fn from(payload: CheckoutPayload) -> Self {
        CheckoutRequest {
            items: payload
                .items
                .into_iter()
                .map(|item| CheckoutLine {
                    product_uuid: item.product_id.into(),
                    quantity: item.quantity,
                })
                .collect(),
            customer_name: payload.customer_name,
            customer_email: payload.customer_email,
        }
    }
}

/// Checkout Response
///
/// `orderId` is set on success, `error` on failure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckoutResponse {
    fn placed(order: Uuid) -> Self {
        Self {
            success: true,
            order_id: Some(order),
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            order_id: None,
            error: Some(message.into()),
        }
    }
}

/// Checkout Handler
///
/// Purchases the cart for the signed-in customer. The order, its items and the
/// stock decrements are committed together; the receipt email is sent
/// afterwards and never affects the response.
#[endpoint(
    tags("checkout"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    request_body = CheckoutPayload,
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed", body = CheckoutResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request", body = CheckoutResponse),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in", body = CheckoutResponse),
        (status_code = StatusCode::FORBIDDEN, description = "Email not verified", body = CheckoutResponse),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found", body = CheckoutResponse),
        (status_code = StatusCode::CONFLICT, description = "Insufficient stock", body = CheckoutResponse),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error", body = CheckoutResponse),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = Arc::clone(depot.obtain_or_500::<Arc<State>>()?);
    let user = depot.user_uuid();

    let placed = if user.is_none() {
        Err(CheckoutError::Unauthorized)
    } else {
        match req.parse_json::<CheckoutPayload>().await {
            Ok(payload) => state.app.checkout.checkout(user, payload.into()).await,
            Err(source) => {
                warn!("rejected unreadable checkout body: {source}");

                state
                    .app
                    .checkout
                    .authorize(user)
                    .await
                    .and(Err(InvalidCheckout::UnreadableBody.into()))
            }
        }
    };

    match placed {
        Ok(order) => {
            observe_checkout("success");

            res.status_code(StatusCode::CREATED);
            res.render(Json(CheckoutResponse::placed(order.into_uuid())));
        }
        Err(error) => {
            observe_checkout(error.kind());
            log_failure(&error);

            res.status_code(status_code(&error));
            res.render(Json(CheckoutResponse::failed(error.to_string())));
        }
    }

    Ok(())
}
