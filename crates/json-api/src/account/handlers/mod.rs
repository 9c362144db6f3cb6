//! Account Handlers

pub(crate) mod forgot_password;
pub(crate) mod login;
pub(crate) mod register;
pub(crate) mod reset_password;
pub(crate) mod send_verification;
pub(crate) mod verify_email;
pub(crate) mod verify_reset_code;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Acknowledges an account action that returns no data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub(crate) const fn ok() -> Self {
        Self { success: true }
    }
}
