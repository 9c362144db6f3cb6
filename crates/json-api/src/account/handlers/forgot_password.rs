//! Forgot Password Handler

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

/// Forgot Password Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// Forgot Password Handler
///
/// Emails a six-digit reset code valid for 15 minutes. The response is the
/// same whether or not an account uses the email.
#[endpoint(
    tags("account"),
    summary = "Forgot Password",
    responses(
        (status_code = StatusCode::OK, description = "Request accepted", body = SuccessResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing or unsupported email"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ForgotPasswordRequest>,
    depot: &mut Depot,
) -> Result<Json<SuccessResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .users
        .request_password_reset(&json.into_inner().email)
        .await
        .map_err(|error| into_status_error(error, Flow::ForgotPassword))?;

    Ok(Json(SuccessResponse::ok()))
}
