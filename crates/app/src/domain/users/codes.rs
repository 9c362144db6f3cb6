//! Six-digit one-time codes for email verification and password resets.

use jiff::{SignedDuration, Timestamp};
use rand::{Rng, rngs::OsRng};

/// How long an issued code stays valid.
pub const CODE_TTL: SignedDuration = SignedDuration::from_mins(15);

/// Number of digits in an issued code.
pub const CODE_LENGTH: usize = 6;

/// A code waiting to be confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode {
    pub code: String,
    pub expires_at: Timestamp,
}

/// Why a submitted code was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRejection {
    Expired,
    Incorrect,
}

impl OneTimeCode {
    /// Issue a fresh random code valid for [`CODE_TTL`] from `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry cannot be represented.
    pub fn issue(now: Timestamp) -> Result<Self, jiff::Error> {
        let code = OsRng.gen_range(100_000..1_000_000_u32).to_string();

        Ok(Self {
            code,
            expires_at: now.checked_add(CODE_TTL)?,
        })
    }

    /// Rebuild a stored code. Both halves must be present for the code to be active.
    #[must_use]
    pub fn from_parts(code: Option<String>, expires_at: Option<Timestamp>) -> Option<Self> {
        Some(Self {
            code: code?,
            expires_at: expires_at?,
        })
    }

    /// Expiry is checked before the digits, so a stale code never reports as merely wrong.
    ///
    /// # Errors
    ///
    /// Returns the [`CodeRejection`] describing why `submitted` is not accepted.
    pub fn check(&self, submitted: &str, now: Timestamp) -> Result<(), CodeRejection> {
        if now > self.expires_at {
            return Err(CodeRejection::Expired);
        }

        if submitted.trim() != self.code {
            return Err(CodeRejection::Incorrect);
        }

        Ok(())
    }
}
