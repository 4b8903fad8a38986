//! Password strength checks and hashing.
//!
//! `ValidatedPassword` wraps a string that is hard enough to guess.
//! `PasswordHash` turns a `ValidatedPassword` into a salted bcrypt hash.

use std::{fmt::Display, sync::LazyLock};

use bcrypt::{hash, verify};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that has been validated, but not yet hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Create and validate a new password from a string.
    ///
    /// `user_inputs` are strings the user has also entered, such as their
    /// email and name, which make a password easier to guess when reused.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] if the password is considered too weak. The
    /// error message explains why and suggests how to make it stronger.
    pub fn new(raw_password_string: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        let password_analysis = zxcvbn(raw_password_string, user_inputs);

        match password_analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_password_string.to_string())),
            _ => Err(Error::TooWeak(
                password_analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

/// Hash of a password that belongs to nobody, checked when a log-in names an unknown email.
static UNKNOWN_USER_HASH: LazyLock<Option<PasswordHash>> = LazyLock::new(|| {
    hash("no user has this password", PasswordHash::DEFAULT_COST)
        .inspect_err(|error| tracing::error!("could not hash the unknown user password: {error}"))
        .ok()
        .map(PasswordHash)
});

/// Spend the same bcrypt work on `raw_password` as a real check would.
///
/// A failed log-in for an unknown email then takes as long as one with a wrong password.
pub fn verify_unknown_user(raw_password: &str) {
    if let Some(password_hash) = UNKNOWN_USER_HASH.as_ref() {
        let _ = password_hash.verify(raw_password);
    }
}

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash a validated password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the password could not be hashed.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash loaded from the database.
    ///
    /// The caller should ensure that `raw_password_hash` is a bcrypt hash.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Validate then hash `raw_password`.
    pub fn from_raw_password(
        raw_password: &str,
        user_inputs: &[&str],
        cost: u32,
    ) -> Result<Self, Error> {
        let validated_password = ValidatedPassword::new(raw_password, user_inputs)?;
        PasswordHash::new(validated_password, cost)
    }

    /// Check that `raw_password` matches the stored password.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash is malformed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
