//! Send Verification Code Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    account::{
        SuccessResponse,
        errors::{Flow, into_status_error},
    },
    extensions::*,
    state::State,
};

/// Send Verification Code Handler
///
/// Emails the signed-in user a six-digit code valid for 15 minutes. A new
/// request replaces any earlier code.
#[endpoint(
    tags("account"),
    summary = "Send Verification Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Code sent", body = SuccessResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Email already verified"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Email could not be sent"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<SuccessResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    state
        .app
        .users
        .send_verification_code(user)
        .await
        .map_err(|error| into_status_error(error, Flow::SendVerification))?;

    Ok(Json(SuccessResponse::ok()))
}
