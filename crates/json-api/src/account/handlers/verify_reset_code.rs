//! Verify Reset Code Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    account::{
        SuccessResponse,
        errors::{Flow, into_status_error},
    },
    extensions::*,
    state::State,
};

/// Verify Reset Code Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyResetCodeRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub code: String,
}

/// Verify Reset Code Handler
///
/// Checks a reset code before the new password is chosen. The code stays
/// usable for the reset itself.
#[endpoint(
    tags("account"),
    summary = "Verify Reset Code",
    responses(
        (status_code = StatusCode::OK, description = "Code accepted", body = SuccessResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid, expired or incorrect code"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyResetCodeRequest>,
    depot: &mut Depot,
) -> Result<Json<SuccessResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    state
        .app
        .users
        .verify_reset_code(&request.email, &request.code)
        .await
        .map_err(|error| into_status_error(error, Flow::VerifyResetCode))?;

    Ok(Json(SuccessResponse::ok()))
}
