//! Verify Email Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    account::{
        SuccessResponse,
        errors::{Flow, into_status_error},
    },
    extensions::*,
    state::State,
};

/// Verify Email Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyEmailRequest {
    /// The six-digit code from the verification email
    #[serde(default)]
    pub code: String,
}

/// Verify Email Handler
///
/// Confirms the signed-in user's email, which allows them to check out.
#[endpoint(
    tags("account"),
    summary = "Verify Email",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Email verified", body = SuccessResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid, expired or incorrect code"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyEmailRequest>,
    depot: &mut Depot,
) -> Result<Json<SuccessResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    state
        .app
        .users
        .verify_email(user, &json.into_inner().code)
        .await
        .map_err(|error| into_status_error(error, Flow::VerifyEmail))?;

    info!(user_uuid = %user, "email verified");

    Ok(Json(SuccessResponse::ok()))
}
