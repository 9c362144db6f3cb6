//! Session token formatting, parsing, and verifier construction.

use std::{fmt, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::records::UserUuid;

/// Session token identifier prefix.
pub const SESSION_TOKEN_PREFIX: &str = "ts";

/// Number of secret bytes encoded in a token.
pub const SESSION_SECRET_BYTES: usize = 32;

const SESSION_SECRET_HEX_CHARS: usize = SESSION_SECRET_BYTES * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTokenVersion {
    V1,
}

impl SessionTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl TryFrom<i16> for SessionTokenVersion {
    type Error = SessionTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(SessionTokenError::UnsupportedVersion),
        }
    }
}

impl FromStr for SessionTokenVersion {
    type Err = SessionTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(SessionTokenError::UnsupportedVersion),
        }
    }
}

#[derive(Clone)]
pub struct SessionSecret {
    bytes: [u8; SESSION_SECRET_BYTES],
}

impl SessionSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SESSION_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SESSION_SECRET_BYTES] {
        &self.bytes
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(**redacted**)")
    }
}

impl Drop for SessionSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedSessionToken {
    pub session_uuid: Uuid,
    pub version: SessionTokenVersion,
    pub secret: SessionSecret,
}

#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("session token format is invalid")]
    InvalidFormat,

    #[error("session token uses an unsupported version")]
    UnsupportedVersion,

    #[error("session token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_session_secret() -> SessionSecret {
    let mut secret = [0_u8; SESSION_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    SessionSecret::from_bytes(secret)
}

/// Format: `ts_{version}_{session_uuid_simple}.{secret_hex}`
#[must_use]
pub fn format_session_token(
    session_uuid: Uuid,
    version: SessionTokenVersion,
    secret: &SessionSecret,
) -> String {
    format!(
        "{SESSION_TOKEN_PREFIX}_{}_{}.{}",
        version.segment(),
        session_uuid.simple(),
        encode_secret_hex(secret.as_bytes())
    )
}

pub fn parse_session_token(token: &str) -> Result<ParsedSessionToken, SessionTokenError> {
    let (prefix_and_id, secret_hex) = token
        .split_once('.')
        .ok_or(SessionTokenError::InvalidFormat)?;

    let mut id_parts = prefix_and_id.splitn(3, '_');

    let prefix = id_parts.next().ok_or(SessionTokenError::InvalidFormat)?;
    let version_segment = id_parts.next().ok_or(SessionTokenError::InvalidFormat)?;
    let uuid_segment = id_parts.next().ok_or(SessionTokenError::InvalidFormat)?;

    if prefix != SESSION_TOKEN_PREFIX {
        return Err(SessionTokenError::InvalidFormat);
    }

    let version = SessionTokenVersion::from_str(version_segment)?;

    let session_uuid =
        Uuid::try_parse(uuid_segment).map_err(|_| SessionTokenError::InvalidFormat)?;

    let secret = decode_secret_hex(secret_hex).ok_or(SessionTokenError::InvalidSecretEncoding)?;

    Ok(ParsedSessionToken {
        session_uuid,
        version,
        secret: SessionSecret::from_bytes(secret),
    })
}

/// SHA-256 verifier stored in place of the token.
///
/// Input: `{session_uuid_hex}:{version_i16_decimal}:{user_uuid_hex}:{secret_hex}`, so a
/// verifier copied onto another user's session row never matches.
#[must_use]
pub fn session_verifier(
    session_uuid: &Uuid,
    version: SessionTokenVersion,
    user: &UserUuid,
    secret: &SessionSecret,
) -> String {
    let mut input = format!(
        "{}:{}:{}:{}",
        session_uuid.simple(),
        version.as_i16(),
        user.as_uuid().simple(),
        encode_secret_hex(secret.as_bytes()),
    );

    let verifier = format!("{:x}", Sha256::digest(input.as_bytes()));

    input.zeroize();

    verifier
}

fn encode_secret_hex(secret: &[u8; SESSION_SECRET_BYTES]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(SESSION_SECRET_HEX_CHARS);

    for byte in secret {
        encoded.push(HEX[usize::from(byte >> 4)] as char);
        encoded.push(HEX[usize::from(byte & 0x0f)] as char);
    }

    encoded
}

fn decode_secret_hex(secret_hex: &str) -> Option<[u8; SESSION_SECRET_BYTES]> {
    let digits = secret_hex.as_bytes();

    if digits.len() != SESSION_SECRET_HEX_CHARS {
        return None;
    }

    let mut secret = [0_u8; SESSION_SECRET_BYTES];

    for (byte, pair) in secret.iter_mut().zip(digits.chunks_exact(2)) {
        *byte = (decode_hex_nibble(pair[0])? << 4) | decode_hex_nibble(pair[1])?;
    }

    Some(secret)
}

fn decode_hex_nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_token_parses_back() -> Result<(), SessionTokenError> {
        let session_uuid = Uuid::now_v7();
        let secret = SessionSecret::from_bytes([0xAB; SESSION_SECRET_BYTES]);
        let token = format_session_token(session_uuid, SessionTokenVersion::V1, &secret);

        assert!(token.starts_with("ts_v1_"));

        let parsed = parse_session_token(&token)?;

        assert_eq!(parsed.session_uuid, session_uuid);
        assert_eq!(parsed.version, SessionTokenVersion::V1);
        assert_eq!(parsed.secret.as_bytes(), secret.as_bytes());

        Ok(())
    }

    #[test]
    fn parse_rejects_foreign_prefix() {
        let result = parse_session_token("lt_v1_00000000000000000000000000000000.aa");

        assert!(matches!(result, Err(SessionTokenError::InvalidFormat)));
    }

    #[test]
    fn parse_rejects_unknown_version() {
        let result = parse_session_token("ts_v9_00000000000000000000000000000000.aa");

        assert!(matches!(result, Err(SessionTokenError::UnsupportedVersion)));
    }

    #[test]
    fn parse_rejects_short_secret() {
        let result = parse_session_token("ts_v1_00000000000000000000000000000000.abcd");

        assert!(matches!(
            result,
            Err(SessionTokenError::InvalidSecretEncoding)
        ));
    }

    #[test]
    fn verifier_depends_on_owner() {
        let session_uuid = Uuid::nil();
        let secret = SessionSecret::from_bytes([0xCD; SESSION_SECRET_BYTES]);
        let owner = UserUuid::new();
        let other = UserUuid::new();

        let first = session_verifier(&session_uuid, SessionTokenVersion::V1, &owner, &secret);
        let again = session_verifier(&session_uuid, SessionTokenVersion::V1, &owner, &secret);
        let foreign = session_verifier(&session_uuid, SessionTokenVersion::V1, &other, &secret);

        assert_eq!(first, again);
        assert_eq!(first.len(), 64);
        assert_ne!(first, foreign);
    }

    #[test]
    fn secret_debug_output_is_redacted() {
        let secret = SessionSecret::from_bytes([0x11; SESSION_SECRET_BYTES]);

        assert_eq!(format!("{secret:?}"), "SessionSecret(**redacted**)");
    }
}
