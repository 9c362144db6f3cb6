//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use titan_app::domain::products::data::ProductListing;

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

/// Blank query values are treated as absent.
pub(crate) fn non_blank(param: QueryParam<String, false>) -> Option<String> {
    param
        .into_inner()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Product Index Handler
///
/// Returns the active catalog, newest first, optionally narrowed to a
/// category and a case-insensitive text search.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    category: QueryParam<String, false>,
    search: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let listing = ProductListing {
        category: non_blank(category),
        search: non_blank(search),
        include_inactive: false,
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
