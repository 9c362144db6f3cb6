//! Register Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use titan_app::domain::users::data::Registration;

use crate::{
    account::errors::{Flow, into_status_error},
    extensions::*,
    state::State,
};

/// Register Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    #[serde(default)]
    pub name: String,

    /// Must belong to an accepted consumer, educational or government mail provider
    #[serde(default)]
    pub email: String,

    /// At least 6 characters
    #[serde(default)]
    pub password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Registration {
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

/// Register Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterResponse {
    pub message: String,
    pub user_id: Uuid,
}

/// Register Handler
///
/// Creates an unverified customer account. Sign in and request a verification
/// code before checking out.
#[endpoint(
    tags("account"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "Account created", body = RegisterResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid or duplicate account"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<RegisterResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let user = state
        .app
        .users
        .register(json.into_inner().into())
        .await
        .map_err(|error| into_status_error(error, Flow::Register))?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(RegisterResponse {
        message: "Account created successfully".to_string(),
        user_id: user.uuid.into_uuid(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use titan_app::domain::users::{
        MockUsersService, UsersServiceError,
        records::{UserRecord, UserUuid},
    };

    use crate::test_helpers::users_service;

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        users_service(users, Router::with_path("auth/register").post(handler))
    }

    #[tokio::test]
    async fn test_register_returns_201_with_user_id() -> TestResult {
        let uuid = UserUuid::new();

        let mut users = MockUsersService::new();

        users
            .expect_register()
            .once()
            .withf(|registration| {
                registration.name == "Sam Lifter"
                    && registration.email == "sam@gmail.com"
                    && registration.password == "deadlift"
            })
            .return_once(move |registration| {
                Ok(UserRecord {
                    uuid,
                    name: registration.name,
                    email: registration.email,
                    email_verified: false,
                    is_admin: false,
                    created_at: Timestamp::UNIX_EPOCH,
                    updated_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut res = TestClient::post("http://example.com/auth/register")
            .json(&json!({
                "name": "Sam Lifter",
                "email": "sam@gmail.com",
                "password": "deadlift",
            }))
            .send(&make_service(users))
            .await;

        let body: RegisterResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.user_id, uuid.into_uuid());
        assert_eq!(body.message, "Account created successfully");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_fields_return_400() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_register()
            .once()
            .withf(|registration| registration.password.is_empty())
            .return_once(|_| Err(UsersServiceError::MissingRequiredData));

        let mut res = TestClient::post("http://example.com/auth/register")
            .json(&json!({ "name": "Sam Lifter", "email": "sam@gmail.com" }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(res.take_string().await?.contains("All fields are required"));

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_returns_400() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_register()
            .once()
            .return_once(|_| Err(UsersServiceError::AlreadyExists));

        let mut res = TestClient::post("http://example.com/auth/register")
            .json(&json!({
                "name": "Sam Lifter",
                "email": "sam@gmail.com",
                "password": "deadlift",
            }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(
            res.take_string()
                .await?
                .contains("An account with that email already exists")
        );

        Ok(())
    }
}
