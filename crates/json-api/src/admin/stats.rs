//! Store Stats Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use titan_app::domain::orders::records::StoreStats;

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Dashboard figures for the admin overview
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatsResponse {
    /// Products in the catalog, archived ones included
    pub total_products: u64,

    pub total_orders: u64,

    /// Sum of all order totals, in cents
    pub total_revenue: u64,

    /// Products with ten or fewer units left
    pub low_stock_products: u64,
}

impl From<StoreStats> for StatsResponse {
    fn from(stats: StoreStats) -> Self {
        StatsResponse {
            total_products: stats.total_products,
            total_orders: stats.total_orders,
            total_revenue: stats.total_revenue,
            low_stock_products: stats.low_stock_products,
        }
    }
}

/// Store Stats Handler
#[endpoint(
    tags("admin"),
    summary = "Store Stats",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<StatsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let stats = state
        .app
        .orders
        .store_stats()
        .await
        .map_err(into_status_error)?;

    Ok(Json(stats.into()))
}
