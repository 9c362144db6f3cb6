//! Admin Product Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use titan_app::domain::products::data::ProductListing;

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        index::{ProductsResponse, non_blank},
    },
    state::State,
};

/// Admin Product Index Handler
///
/// Lists every product, archived ones included.
#[endpoint(
    tags("admin"),
    summary = "List All Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    category: QueryParam<String, false>,
    search: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let listing = ProductListing {
        category: non_blank(category),
        search: non_blank(search),
        include_inactive: true,
    };

    let products = state
        .app
        .products
        .list_products(listing)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}
