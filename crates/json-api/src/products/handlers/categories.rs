//! Category Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, products::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoriesResponse {
    /// Distinct categories of the active catalog, sorted
    pub categories: Vec<String>,
}

/// Category Index Handler
#[endpoint(tags("products"), summary = "List Categories")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CategoriesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let categories = state
        .app
        .products
        .list_categories()
        .await
        .map_err(into_status_error)?;

    Ok(Json(CategoriesResponse { categories }))
}
