//! Users service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::users::{
        codes::{CODE_LENGTH, OneTimeCode},
        data::{NewUser, PasswordReset, Registration},
        email::is_accepted_email,
        errors::UsersServiceError,
        password::{hash_password, validate_password, verify_password},
        records::{AccountRecord, Identity, UserRecord, UserUuid},
        repository::PgUsersRepository,
    },
    notifications::{AccountMailer, Recipient},
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
    mail: AccountMailer,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db, mail: AccountMailer) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
            mail,
        }
    }

    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountRecord>, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let account = self.repository.find_account_by_email(&mut tx, email).await?;

        tx.commit().await?;

        Ok(account)
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        if user.name.trim().is_empty() || user.email.trim().is_empty() {
            return Err(UsersServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .repository
            .find_user(&mut tx, user)
            .await?
            .ok_or(UsersServiceError::NotFound)?;

        tx.commit().await?;

        Ok(record)
    }

    async fn identify(&self, user: UserUuid) -> Result<Option<Identity>, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.find_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(record.as_ref().map(Identity::from))
    }

    async fn mark_email_verified(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.mark_email_verified(&mut tx, user).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn register(&self, registration: Registration) -> Result<UserRecord, UsersServiceError> {
        let name = registration.name.trim();
        let email = registration.email.trim();

        if name.is_empty() || email.is_empty() || registration.password.is_empty() {
            return Err(UsersServiceError::MissingRequiredData);
        }

        validate_password(&registration.password)?;

        if !is_accepted_email(email) {
            return Err(UsersServiceError::UnsupportedEmailDomain);
        }

        let password_hash = hash_password(&registration.password)?;

        let user = self
            .create_user(NewUser {
                uuid: UserUuid::new(),
                name: name.to_string(),
                email: email.to_string(),
                email_verified: false,
                is_admin: false,
                password_hash: Some(password_hash),
            })
            .await?;

        info!(user_uuid = %user.uuid, "registered user");

        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserRecord, UsersServiceError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(UsersServiceError::MissingRequiredData);
        }

        let account = self
            .find_account_by_email(email)
            .await?
            .ok_or(UsersServiceError::InvalidCredentials)?;

        let matches = account
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(password, hash));

        if !matches {
            return Err(UsersServiceError::InvalidCredentials);
        }

        Ok(account.user)
    }

    async fn send_verification_code(&self, user: UserUuid) -> Result<(), UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .repository
            .find_user(&mut tx, user)
            .await?
            .ok_or(UsersServiceError::NotFound)?;

        if record.email_verified {
            return Err(UsersServiceError::AlreadyVerified);
        }

        let code = OneTimeCode::issue(Timestamp::now())?;

        self.repository
            .set_verification_code(&mut tx, user, &code)
            .await?;

        tx.commit().await?;

        self.mail
            .send_verification_code(
                Recipient {
                    name: &record.name,
                    email: &record.email,
                },
                &code.code,
            )
            .await?;

        Ok(())
    }

    async fn verify_email(
        &self,
        user: UserUuid,
        code: &str,
    ) -> Result<UserRecord, UsersServiceError> {
        let code = code.trim();

        if code.len() != CODE_LENGTH {
            return Err(UsersServiceError::MalformedCode);
        }

        let mut tx = self.db.begin_transaction().await?;

        let account = self
            .repository
            .find_account(&mut tx, user)
            .await?
            .ok_or(UsersServiceError::NotFound)?;

        if account.user.email_verified {
            return Err(UsersServiceError::AlreadyVerified);
        }

        account
            .verification
            .as_ref()
            .ok_or(UsersServiceError::NoActiveCode)?
            .check(code, Timestamp::now())?;

        let verified = self.repository.mark_email_verified(&mut tx, user).await?;

        tx.commit().await?;

        info!(user_uuid = %user, "verified email");

        Ok(verified)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), UsersServiceError> {
        let email = email.trim();

        if email.is_empty() {
            return Err(UsersServiceError::MissingRequiredData);
        }

        if !is_accepted_email(email) {
            return Err(UsersServiceError::UnsupportedEmailDomain);
        }

        let mut tx = self.db.begin_transaction().await?;

        let Some(account) = self
            .repository
            .find_account_by_email(&mut tx, email)
            .await?
        else {
            return Ok(());
        };

        let code = OneTimeCode::issue(Timestamp::now())?;

        self.repository
            .set_reset_code(&mut tx, account.user.uuid, &code)
            .await?;

        tx.commit().await?;

        self.mail
            .send_password_reset_code(
                Recipient {
                    name: &account.user.name,
                    email: &account.user.email,
                },
                &code.code,
            )
            .await?;

        Ok(())
    }

    async fn verify_reset_code(&self, email: &str, code: &str) -> Result<(), UsersServiceError> {
        if email.trim().is_empty() || code.trim().is_empty() {
            return Err(UsersServiceError::MissingRequiredData);
        }

        let reset = self
            .find_account_by_email(email)
            .await?
            .and_then(|account| account.reset)
            .ok_or(UsersServiceError::InvalidResetCode)?;

        reset.check(code, Timestamp::now())?;

        Ok(())
    }

    async fn reset_password(&self, reset: PasswordReset) -> Result<(), UsersServiceError> {
        if reset.email.trim().is_empty()
            || reset.code.trim().is_empty()
            || reset.new_password.is_empty()
        {
            return Err(UsersServiceError::MissingRequiredData);
        }

        validate_password(&reset.new_password)?;

        let mut tx = self.db.begin_transaction().await?;

        let account = self
            .repository
            .find_account_by_email(&mut tx, &reset.email)
            .await?
            .ok_or(UsersServiceError::InvalidResetCode)?;

        account
            .reset
            .as_ref()
            .ok_or(UsersServiceError::NoActiveReset)?
            .check(&reset.code, Timestamp::now())?;

        let password_hash = hash_password(&reset.new_password)?;

        self.repository
            .reset_password(&mut tx, account.user.uuid, &password_hash)
            .await?;

        tx.commit().await?;

        info!(user_uuid = %account.user.uuid, "password reset");

        Ok(())
    }
}

/// Identity provider for storefront users.
#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Resolve the identity of a user, or `None` when the user does not exist.
    async fn identify(&self, user: UserUuid) -> Result<Option<Identity>, UsersServiceError>;

    async fn mark_email_verified(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Create an unverified customer with a password. Only accepted email
    /// domains may sign up.
    async fn register(&self, registration: Registration) -> Result<UserRecord, UsersServiceError>;

    /// Check a password. Unknown emails and wrong passwords are indistinguishable.
    async fn login(&self, email: &str, password: &str) -> Result<UserRecord, UsersServiceError>;

    /// Issue a fresh verification code, replacing any earlier one, and email it.
    async fn send_verification_code(&self, user: UserUuid) -> Result<(), UsersServiceError>;

    /// Confirm the user's email with a code from [`UsersService::send_verification_code`].
    async fn verify_email(
        &self,
        user: UserUuid,
        code: &str,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Email a reset code. Succeeds without sending anything when no account
    /// uses `email`, so responses never reveal which emails have accounts.
    async fn request_password_reset(&self, email: &str) -> Result<(), UsersServiceError>;

    /// Check a reset code without consuming it.
    async fn verify_reset_code(&self, email: &str, code: &str) -> Result<(), UsersServiceError>;

    /// Set a new password and retire the reset code.
    async fn reset_password(&self, reset: PasswordReset) -> Result<(), UsersServiceError>;
}
