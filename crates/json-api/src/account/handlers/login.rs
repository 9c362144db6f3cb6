//! Login Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use titan_app::{auth::SIGN_IN_SESSION_TTL, domain::users::records::UserRecord};

use crate::{
    account::errors::{Flow, into_status_error},
    extensions::*,
    state::State,
};

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// The signed-in account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub is_admin: bool,
}

impl From<UserRecord> for AccountResponse {
    fn from(user: UserRecord) -> Self {
        AccountResponse {
            id: user.uuid.into_uuid(),
            name: user.name,
            email: user.email,
            email_verified: user.email_verified,
            is_admin: user.is_admin,
        }
    }
}

/// Login Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    /// Bearer token for the `Authorization` header; shown only once
    pub token: String,

    pub expires_at: String,
    pub user: AccountResponse,
}

/// Login Handler
///
/// Exchanges an email and password for a bearer session.
#[endpoint(
    tags("account"),
    summary = "Login",
    responses(
        (status_code = StatusCode::OK, description = "Signed in", body = LoginResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Email and password required"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<LoginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let user = state
        .app
        .users
        .login(&request.email, &request.password)
        .await
        .map_err(|error| into_status_error(error, Flow::Login))?;

    let expires_at = Timestamp::now()
        .checked_add(SIGN_IN_SESSION_TTL)
        .or_500("failed to compute session expiry")?;

    let issued = state
        .app
        .auth
        .issue_session(user.uuid, Some(expires_at))
        .await
        .map_err(|source| {
            error!("failed to issue session: {source}");

            StatusError::internal_server_error().brief("Error signing in")
        })?;

    info!(user_uuid = %user.uuid, session_uuid = %issued.metadata.uuid, "signed in");

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: expires_at.to_string(),
        user: user.into(),
    }))
}
