//! Authentication primitives: submitted credentials and stored hashes.
//!
//! Submitted credentials carry no format constraints; any pair of strings is
//! a valid login attempt and simply fails verification when it matches no
//! registry entry. Stored credentials are salted argon2 hashes in PHC string
//! format; plaintext passwords never persist beyond the request that carried
//! them.

use std::fmt;
use std::sync::OnceLock;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use zeroize::Zeroizing;

/// Username/password pair submitted by a client.
///
/// The password buffer is zeroed on drop and redacted from `Debug` output so
/// credentials cannot leak through logging.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::new("gm", "secret");
/// assert_eq!(creds.username(), "gm");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Clone)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// No trimming or validation is applied; lookups are exact and
    /// case-sensitive.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Username string used for registry lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Failures raised while deriving or parsing a stored credential hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialHashError {
    /// The stored value is not a valid PHC string.
    #[error("credential hash is not a valid PHC string: {0}")]
    InvalidFormat(String),
    /// Hashing the password failed.
    #[error("failed to derive credential hash: {0}")]
    DerivationFailed(String),
}

/// Salted one-way password hash in PHC string format.
///
/// ## Invariants
/// - The inner string always parses as a PHC-format hash.
///
/// Verification delegates to argon2, which compares digests in constant
/// time, so a mismatch reveals nothing about how close the guess was.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Hash a password with a freshly generated salt.
    pub fn derive(password: &str) -> Result<Self, CredentialHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CredentialHashError::DerivationFailed(err.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Validate and wrap an existing PHC string (e.g. from the registry file).
    pub fn parse(phc: impl Into<String>) -> Result<Self, CredentialHashError> {
        let phc = phc.into();
        PasswordHash::new(&phc)
            .map_err(|err| CredentialHashError::InvalidFormat(err.to_string()))?;
        Ok(Self(phc))
    }

    /// Verify a password against this hash.
    pub fn matches(&self, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            // Unreachable for values built via `derive`/`parse`; fail closed.
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// The PHC string, for serialisation into registry entries.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// A fixed hash verified against when a username is unknown, so the
    /// unknown-user and wrong-password paths take comparable time.
    pub fn timing_shield() -> &'static Self {
        static SHIELD: OnceLock<CredentialHash> = OnceLock::new();
        SHIELD.get_or_init(|| {
            match Self::derive("timing-shield") {
                Ok(hash) => hash,
                Err(err) => panic!("failed to derive timing shield hash: {err}"),
            }
        })
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}
