//! Password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::domain::users::errors::UsersServiceError;

/// Shortest password accepted at signup and reset.
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub(crate) fn validate_password(password: &str) -> Result<(), UsersServiceError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UsersServiceError::WeakPassword);
    }

    Ok(())
}

/// Hash a password with Argon2id and a random salt, in PHC string format.
///
/// # Errors
///
/// Returns [`UsersServiceError::PasswordHash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, UsersServiceError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_hash_failure| UsersServiceError::PasswordHash)
}

/// Whether `password` matches a stored PHC hash. Unparseable hashes never match.
pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn hashed_password_verifies() -> TestResult {
        let hash = hash_password("squat-heavy")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("squat-heavy", &hash));
        assert!(!verify_password("squat-light", &hash));

        Ok(())
    }

    #[test]
    fn same_password_hashes_differently() -> TestResult {
        assert_ne!(hash_password("squat-heavy")?, hash_password("squat-heavy")?);

        Ok(())
    }

    #[test]
    fn garbage_hash_never_matches() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn short_passwords_are_weak() {
        assert!(matches!(
            validate_password("12345"),
            Err(UsersServiceError::WeakPassword)
        ));
        assert!(validate_password("123456").is_ok());
    }
}
