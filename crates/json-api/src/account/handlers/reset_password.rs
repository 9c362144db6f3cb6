//! Reset Password Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use titan_app::domain::users::data::PasswordReset;

use crate::{
    account::{
        SuccessResponse,
        errors::{Flow, into_status_error},
    },
    extensions::*,
    state::State,
};

/// Reset Password Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub code: String,

    /// At least 6 characters
    #[serde(default)]
    pub new_password: String,
}

impl From<ResetPasswordRequest> for PasswordReset {
    fn from(request: ResetPasswordRequest) -> Self {
        PasswordReset {
            email: request.email,
            code: request.code,
            new_password: request.new_password,
        }
    }
}

/// Reset Password Handler
///
/// Sets a new password using an emailed reset code. The code cannot be used
/// again afterwards.
#[endpoint(
    tags("account"),
    summary = "Reset Password",
    responses(
        (status_code = StatusCode::OK, description = "Password changed", body = SuccessResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request or code"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ResetPasswordRequest>,
    depot: &mut Depot,
) -> Result<Json<SuccessResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .users
        .reset_password(json.into_inner().into())
        .await
        .map_err(|error| into_status_error(error, Flow::ResetPassword))?;

    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use titan_app::domain::users::{MockUsersService, UsersServiceError};

    use crate::test_helpers::users_service;

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        users_service(users, Router::with_path("auth/reset-password").post(handler))
    }

    fn payload() -> serde_json::Value {
        json!({ "email": "sam@gmail.com", "code": "135790", "newPassword": "benchpress" })
    }

    #[tokio::test]
    async fn test_reset_passes_camel_case_fields() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_reset_password()
            .once()
            .withf(|reset| {
                *reset
                    == PasswordReset {
                        email: "sam@gmail.com".to_string(),
                        code: "135790".to_string(),
                        new_password: "benchpress".to_string(),
                    }
            })
            .return_once(|_| Ok(()));

        let mut res = TestClient::post("http://example.com/auth/reset-password")
            .json(&payload())
            .send(&make_service(users))
            .await;

        let body: SuccessResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success, "expected success");

        Ok(())
    }

    #[tokio::test]
    async fn test_rejections_return_400_with_their_message() -> TestResult {
        let cases = [
            (UsersServiceError::MissingRequiredData, "All fields are required"),
            (
                UsersServiceError::WeakPassword,
                "Password must be at least 6 characters",
            ),
            (UsersServiceError::InvalidResetCode, "Invalid or expired code"),
            (
                UsersServiceError::NoActiveReset,
                "No active request found. Please request the code again.",
            ),
            (UsersServiceError::IncorrectCode, "Incorrect code"),
        ];

        for (error, message) in cases {
            let mut users = MockUsersService::new();

            users
                .expect_reset_password()
                .once()
                .return_once(move |_| Err(error));

            let mut res = TestClient::post("http://example.com/auth/reset-password")
                .json(&payload())
                .send(&make_service(users))
                .await;

            assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
            assert!(
                res.take_string().await?.contains(message),
                "expected {message:?}"
            );
        }

        Ok(())
    }
}
