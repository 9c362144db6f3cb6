//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::{
    auth::{
        AuthServiceError, IssuedSession, SessionMetadata, SessionTokenVersion,
        format_session_token, generate_session_secret,
        models::{NewSession, SessionUuid},
        parse_session_token,
        repository::PgAuthRepository,
        session_verifier,
    },
    domain::users::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// List all sessions of the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_sessions(
        &self,
        user: UserUuid,
    ) -> Result<Vec<SessionMetadata>, AuthServiceError> {
        Ok(self.repository.list_sessions_by_user(user).await?)
    }

    /// Revoke a session. Returns `true` if the session was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_session(&self, session: SessionUuid) -> Result<bool, AuthServiceError> {
        Ok(self
            .repository
            .revoke_session(session)
            .await?
            .is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    #[instrument(name = "auth.issue_session", skip(self), err)]
    async fn issue_session(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedSession, AuthServiceError> {
        let session_uuid = SessionUuid::new();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_secret();
        let token = format_session_token(session_uuid.into_uuid(), version, &secret);
        let token_hash = session_verifier(session_uuid.as_uuid(), version, &user, &secret);

        let metadata = self
            .repository
            .create_session(&NewSession {
                uuid: session_uuid,
                user_uuid: user,
                version,
                token_hash,
                expires_at,
            })
            .await?;

        Ok(IssuedSession { token, metadata })
    }

    #[instrument(name = "auth.authenticate_bearer", skip(self, bearer_token), err)]
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let parsed = parse_session_token(bearer_token).map_err(|_| AuthServiceError::NotFound)?;
        let session_uuid = SessionUuid::from_uuid(parsed.session_uuid);

        let session = self
            .repository
            .find_active_session(session_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let expected = session_verifier(
            &parsed.session_uuid,
            parsed.version,
            &session.user_uuid,
            &parsed.secret,
        );

        if session.version != parsed.version || expected != session.token_hash {
            return Err(AuthServiceError::NotFound);
        }

        if let Err(error) = self.repository.touch_session(session_uuid).await {
            debug!(%error, "failed to record session use");
        }

        Ok(session.user_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer session token to the user it was issued for.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;

    /// Issue a new session token for the given user. The raw token is only
    /// available in the returned value.
    ///
    /// Fails with [`AuthServiceError::UnknownUser`] when the user does not exist.
    async fn issue_session(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedSession, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use crate::{
        domain::users::UsersService,
        test::{TestContext, helpers::new_user},
    };

    use super::*;

    async fn user(ctx: &TestContext) -> TestResult<UserUuid> {
        let user = ctx
            .users
            .create_user(new_user("session@example.com", true, false))
            .await?;

        Ok(user.uuid)
    }

    #[tokio::test]
    async fn issued_session_authenticates_its_user() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = user(&ctx).await?;

        let issued = ctx.auth.issue_session(owner, None).await?;

        assert_eq!(issued.metadata.user_uuid, owner);
        assert_eq!(ctx.auth.authenticate_bearer(&issued.token).await?, owner);

        let sessions = ctx.auth.list_sessions(owner).await?;

        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].last_used_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn tampered_secret_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = user(&ctx).await?;

        let issued = ctx.auth.issue_session(owner, None).await?;
        let (id, secret) = issued.token.split_once('.').ok_or("token has no secret")?;
        let flipped = if secret.starts_with('0') { "1" } else { "0" };
        let tampered = format!("{id}.{flipped}{}", &secret[1..]);

        let result = ctx.auth.authenticate_bearer(&tampered).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn revoked_session_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = user(&ctx).await?;

        let issued = ctx.auth.issue_session(owner, None).await?;

        assert!(ctx.auth.revoke_session(issued.metadata.uuid).await?);
        assert!(!ctx.auth.revoke_session(issued.metadata.uuid).await?);

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn expired_session_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = user(&ctx).await?;
        let expired = Timestamp::now().checked_sub(SignedDuration::from_secs(60))?;

        let issued = ctx.auth.issue_session(owner, Some(expired)).await?;

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.authenticate_bearer("not-a-token").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn issue_session_for_unknown_user_fails() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.issue_session(UserUuid::new(), None).await;

        assert!(
            matches!(result, Err(AuthServiceError::UnknownUser)),
            "expected UnknownUser, got {result:?}"
        );
    }
}
