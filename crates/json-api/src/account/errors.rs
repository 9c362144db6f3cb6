//! Account Errors

use std::error::Error as _;

use salvo::http::StatusError;
use tracing::error;

use titan_app::domain::users::UsersServiceError;

/// The account endpoint an error came from; missing-field and failure messages
/// differ between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Register,
    Login,
    SendVerification,
    VerifyEmail,
    ForgotPassword,
    VerifyResetCode,
    ResetPassword,
}

impl Flow {
    const fn missing_fields(self) -> &'static str {
        match self {
            Self::Register | Self::ResetPassword => "All fields are required",
            Self::Login => "Email and password required",
            Self::ForgotPassword => "Email is required",
            Self::VerifyResetCode => "Incomplete data",
            Self::SendVerification | Self::VerifyEmail => "Invalid code",
        }
    }

    const fn failure(self) -> &'static str {
        match self {
            Self::Register => "Error creating account",
            Self::Login => "Error signing in",
            Self::SendVerification => "Error sending the email",
            Self::VerifyEmail => "Error verifying email",
            Self::ForgotPassword => "Error processing the request",
            Self::VerifyResetCode => "Error verifying the code",
            Self::ResetPassword => "Error resetting password",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::SendVerification => "send_verification",
            Self::VerifyEmail => "verify_email",
            Self::ForgotPassword => "forgot_password",
            Self::VerifyResetCode => "verify_reset_code",
            Self::ResetPassword => "reset_password",
        }
    }
}

pub(crate) fn into_status_error(error: UsersServiceError, flow: Flow) -> StatusError {
    match error {
        UsersServiceError::AlreadyExists => {
            StatusError::bad_request().brief("An account with that email already exists")
        }
        UsersServiceError::NotFound => StatusError::not_found().brief("User not found"),
        UsersServiceError::MissingRequiredData => {
            StatusError::bad_request().brief(flow.missing_fields())
        }
        UsersServiceError::InvalidData => StatusError::bad_request().brief("Invalid account data"),
        UsersServiceError::WeakPassword => {
            StatusError::bad_request().brief("Password must be at least 6 characters")
        }
        UsersServiceError::UnsupportedEmailDomain => StatusError::bad_request().brief(
            "Please use a real email address (Gmail, Hotmail, Outlook, Yahoo, iCloud, etc.)",
        ),
        UsersServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid credentials")
        }
        UsersServiceError::AlreadyVerified => {
            StatusError::bad_request().brief("Email is already verified")
        }
        UsersServiceError::MalformedCode => StatusError::bad_request().brief("Invalid code"),
        UsersServiceError::NoActiveCode => {
            StatusError::bad_request().brief("No active code. Please request a new one.")
        }
        UsersServiceError::NoActiveReset => StatusError::bad_request()
            .brief("No active request found. Please request the code again."),
        UsersServiceError::InvalidResetCode => {
            StatusError::bad_request().brief("Invalid or expired code")
        }
        UsersServiceError::CodeExpired => {
            StatusError::bad_request().brief("The code has expired. Please request a new one.")
        }
        UsersServiceError::IncorrectCode => StatusError::bad_request().brief("Incorrect code"),
        failure @ (UsersServiceError::PasswordHash
        | UsersServiceError::Mail(_)
        | UsersServiceError::Timestamp(_)
        | UsersServiceError::Sql(_)) => {
            let cause = failure
                .source()
                .map_or_else(|| failure.to_string(), ToString::to_string);

            error!(flow = flow.name(), error = %failure, cause = %cause, "account request failed");

            StatusError::internal_server_error().brief(flow.failure())
        }
    }
}
