//! Auth data models.

use jiff::{SignedDuration, Timestamp};

use crate::{
    auth::SessionTokenVersion, domain::users::records::UserUuid, uuids::TypedUuid,
};

/// Lifetime of sessions issued by a password sign-in.
pub const SIGN_IN_SESSION_TTL: SignedDuration = SignedDuration::from_hours(30 * 24);

/// Session UUID
pub type SessionUuid = TypedUuid<SessionMetadata>;

/// Session data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    /// User that owns this session.
    pub user_uuid: UserUuid,

    /// Token format/hash version.
    pub version: SessionTokenVersion,

    /// SHA-256 verifier for the token secret material.
    pub token_hash: String,
}

/// Session metadata persisted in storage.
#[derive(Debug, Clone)]
pub struct SessionMetadata {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// New session persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewSession {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub token_hash: String,
    pub expires_at: Option<Timestamp>,
}

/// Session issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub metadata: SessionMetadata,
}
