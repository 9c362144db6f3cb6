//! Archive Product Handler

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

/// Archive Product Handler
///
/// Hides the product from the catalog and from checkout. Past orders keep
/// referring to it, so nothing is deleted.
#[endpoint(
    tags("admin"),
    summary = "Archive Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product archived", body = ProductResponse),
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

    let archived = state
        .app
        .products
        .archive_product(uuid)
        .await
        .map_err(into_status_error)?;

    info!(product_uuid = %uuid, "archived product");

    Ok(Json(archived.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use titan_app::domain::products::{MockProductsService, ProductsServiceError};

    use crate::test_helpers::{admin_products_service, make_product};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        admin_products_service(
            products,
            Router::with_path("admin/products/{product}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_archive_product() -> TestResult {
        let uuid = ProductUuid::new();

        let mut archived = make_product(uuid);

        archived.is_active = false;

        let mut products = MockProductsService::new();

        products
            .expect_archive_product()
            .once()
            .withf(move |id| *id == uuid)
            .return_once(move |_| Ok(archived));

        let mut res = TestClient::delete(format!("http://example.com/admin/products/{uuid}"))
            .send(&make_service(products))
            .await;

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(!body.is_active, "expected product to be archived");

        Ok(())
    }

    #[tokio::test]
    async fn test_archive_missing_product_returns_404() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_archive_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let res = TestClient::delete(format!(
            "http://example.com/admin/products/{}",
            ProductUuid::new()
        ))
        .send(&make_service(products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
