//! User Records

use jiff::Timestamp;

use crate::{domain::users::codes::OneTimeCode, uuids::TypedUuid};

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// User Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A user together with the credentials and pending codes kept alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AccountRecord {
    pub user: UserRecord,
    pub password_hash: Option<String>,
    pub verification: Option<OneTimeCode>,
    pub reset: Option<OneTimeCode>,
}

/// What the storefront needs to know about the caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user: UserUuid,
    pub email_verified: bool,
    pub is_admin: bool,
}

impl Identity {
    /// Admins may purchase before verifying their email.
    #[must_use]
    pub const fn may_purchase(&self) -> bool {
        self.email_verified || self.is_admin
    }
}

impl From<&UserRecord> for Identity {
    fn from(user: &UserRecord) -> Self {
        Self {
            user: user.uuid,
            email_verified: user.email_verified,
            is_admin: user.is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email_verified: bool, is_admin: bool) -> Identity {
        Identity {
            user: UserUuid::new(),
            email_verified,
            is_admin,
        }
    }

    #[test]
    fn verified_users_may_purchase() {
        assert!(identity(true, false).may_purchase());
    }

    #[test]
    fn unverified_admins_may_purchase() {
        assert!(identity(false, true).may_purchase());
    }

    #[test]
    fn unverified_customers_may_not_purchase() {
        assert!(!identity(false, false).may_purchase());
    }
}
