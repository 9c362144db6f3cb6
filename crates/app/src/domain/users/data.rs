//! Users Data

use std::fmt;

use crate::domain::users::records::UserUuid;

/// New User Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub is_admin: bool,

    /// Argon2 PHC hash; users without one cannot sign in with a password.
    pub password_hash: Option<String>,
}

/// Self-service signup.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Password change authorised by a reset code.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordReset {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl fmt::Debug for PasswordReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordReset")
            .field("email", &self.email)
            .field("code", &"[redacted]")
            .field("new_password", &"[redacted]")
            .finish()
    }
}
