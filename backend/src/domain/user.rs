//! User data model: registry records and the session identity copied from
//! them on login.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::auth::CredentialHash;

/// Role tag granted full access to the map authoring endpoints.
pub const ADMIN_ROLE: &str = "admin";

/// Validation errors returned by the user newtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Username was missing or blank.
    EmptyUsername,
    /// Username exceeds the allowed length.
    UsernameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// Username contains characters outside the allowed set.
    UsernameInvalidCharacters,
    /// Display name was missing or blank once trimmed.
    EmptyDisplayName,
    /// Display name is shorter than the minimum.
    DisplayNameTooShort {
        /// Minimum accepted length in characters.
        min: usize,
    },
    /// Display name exceeds the allowed length.
    DisplayNameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// Display name contains characters outside the allowed set.
    DisplayNameInvalidCharacters,
    /// Role was missing or blank.
    EmptyRole,
    /// Role is not a lowercase tag.
    RoleInvalidCharacters,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, dots, dashes, or underscores",
            ),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooShort { min } => {
                write!(f, "display name must be at least {min} characters")
            }
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::DisplayNameInvalidCharacters => write!(
                f,
                "display name may only contain letters, numbers, spaces, or underscores",
            ),
            Self::EmptyRole => write!(f, "role must not be empty"),
            Self::RoleInvalidCharacters => {
                write!(f, "role must be a lowercase tag such as 'admin'")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        let pattern = "^[A-Za-z0-9._-]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Registry lookup key; matched case-sensitively and exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        if username.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&username) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 3;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 32;

static DISPLAY_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn display_name_regex() -> &'static Regex {
    DISPLAY_NAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[A-Za-z0-9_ ]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("display name regex failed to compile: {error}"))
    })
}

/// Human readable name shown to other operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }

        let length = display_name.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(UserValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }

        if !display_name_regex().is_match(&display_name) {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }

        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static ROLE_RE: OnceLock<Regex> = OnceLock::new();

fn role_regex() -> &'static Regex {
    ROLE_RE.get_or_init(|| {
        let pattern = "^[a-z][a-z0-9-]*$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("role regex failed to compile: {error}"))
    })
}

/// Authorization tag attached to a user, e.g. `admin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Role(String);

impl Role {
    /// Validate and construct a [`Role`].
    pub fn new(role: impl Into<String>) -> Result<Self, UserValidationError> {
        let role = role.into();
        if role.is_empty() {
            return Err(UserValidationError::EmptyRole);
        }
        if !role_regex().is_match(&role) {
            return Err(UserValidationError::RoleInvalidCharacters);
        }
        Ok(Self(role))
    }

    /// Whether this role grants map authoring access.
    pub fn is_admin(&self) -> bool {
        self.0 == ADMIN_ROLE
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.0
    }
}

impl TryFrom<String> for Role {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered operator, read-only at runtime.
///
/// Records live in the static registry loaded at startup; the password is
/// held only as a salted hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    username: Username,
    credential: CredentialHash,
    display_name: DisplayName,
    role: Role,
}

impl UserRecord {
    /// Build a record from validated components.
    pub fn new(
        username: Username,
        credential: CredentialHash,
        display_name: DisplayName,
        role: Role,
    ) -> Self {
        Self {
            username,
            credential,
            display_name,
            role,
        }
    }

    /// Registry lookup key.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Stored password hash.
    pub fn credential(&self) -> &CredentialHash {
        &self.credential
    }

    /// Name presented to clients.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Authorization tag.
    pub fn role(&self) -> &Role {
        &self.role
    }
}

/// Authenticated identity persisted in the session cookie.
///
/// ## Invariants
/// - Constructed only from a validated [`UserRecord`], so username and role
///   are always non-empty while a session is authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct SessionIdentity {
    #[schema(value_type = String, example = "gm")]
    username: Username,
    #[schema(value_type = String, example = "Game Master")]
    display_name: DisplayName,
    #[schema(value_type = String, example = "admin")]
    role: Role,
}

impl SessionIdentity {
    /// Build an identity from validated components.
    pub fn new(username: Username, display_name: DisplayName, role: Role) -> Self {
        Self {
            username,
            display_name,
            role,
        }
    }

    /// Registry lookup key of the authenticated user.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Name presented to clients.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Authorization tag of the authenticated user.
    pub fn role(&self) -> &Role {
        &self.role
    }
}

impl From<&UserRecord> for SessionIdentity {
    fn from(record: &UserRecord) -> Self {
        Self::new(
            record.username().clone(),
            record.display_name().clone(),
            record.role().clone(),
        )
    }
}
