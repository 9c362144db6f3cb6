//! Users service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{domain::users::codes::CodeRejection, notifications::MailerError};

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("user already exists")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("password is too short")]
    WeakPassword,

    #[error("email domain is not accepted")]
    UnsupportedEmailDomain,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email is already verified")]
    AlreadyVerified,

    #[error("code is not six digits")]
    MalformedCode,

    #[error("no active verification code")]
    NoActiveCode,

    #[error("no active password reset")]
    NoActiveReset,

    #[error("reset code is not valid for this account")]
    InvalidResetCode,

    #[error("code has expired")]
    CodeExpired,

    #[error("code is incorrect")]
    IncorrectCode,

    #[error("password hashing failed")]
    PasswordHash,

    #[error("failed to send account email")]
    Mail(#[source] MailerError),

    #[error("invalid timestamp")]
    Timestamp(#[source] jiff::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(_) | None => Self::Sql(error),
        }
    }
}

impl From<MailerError> for UsersServiceError {
    fn from(error: MailerError) -> Self {
        Self::Mail(error)
    }
}

impl From<jiff::Error> for UsersServiceError {
    fn from(error: jiff::Error) -> Self {
        Self::Timestamp(error)
    }
}

impl From<CodeRejection> for UsersServiceError {
    fn from(rejection: CodeRejection) -> Self {
        match rejection {
            CodeRejection::Expired => Self::CodeExpired,
            CodeRejection::Incorrect => Self::IncorrectCode,
        }
    }
}
