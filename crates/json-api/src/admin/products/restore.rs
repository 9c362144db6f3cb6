//! Restore Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use titan_app::domain::products::records::ProductUuid;

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Restore Product Handler
///
/// Puts an archived product back on sale.
#[endpoint(
    tags("admin"),
    summary = "Restore Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product restored", body = ProductResponse),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let uuid = ProductUuid::from_uuid(product.into_inner());

    let restored = state
        .app
        .products
        .restore_product(uuid)
        .await
        .map_err(into_status_error)?;

    info!(product_uuid = %uuid, "restored product");

    Ok(Json(restored.into()))
}
