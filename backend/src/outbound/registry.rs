//! JSON-file-backed implementation of the [`UserDirectory`] port.
//!
//! The registry is configuration data: read once at startup, validated
//! eagerly so a malformed entry fails the boot rather than a login, and
//! immutable afterwards.
//!
//! File shape:
//!
//! ```json
//! [
//!   {
//!     "username": "gm",
//!     "passwordHash": "$argon2id$v=19$...",
//!     "displayName": "Game Master",
//!     "role": "admin"
//!   }
//! ]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::domain::ports::UserDirectory;
use crate::domain::{CredentialHash, DisplayName, Role, UserRecord, Username};

/// Errors raised while loading the registry file.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Reading the file failed.
    #[error("failed to read user registry at {path}: {source}")]
    Read {
        /// Configured registry path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON of the expected shape.
    #[error("failed to parse user registry at {path}: {source}")]
    Parse {
        /// Configured registry path.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// An entry failed domain validation.
    #[error("invalid registry entry for '{username}': {reason}")]
    InvalidEntry {
        /// Offending lookup key as written in the file.
        username: String,
        /// Validation failure description.
        reason: String,
    },
    /// Two entries share a username.
    #[error("duplicate username '{username}' in user registry")]
    DuplicateUsername {
        /// Repeated lookup key.
        username: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RegistryEntryDto {
    username: String,
    password_hash: String,
    display_name: String,
    role: String,
}

impl RegistryEntryDto {
    fn into_record(self) -> Result<UserRecord, RegistryError> {
        let invalid = |username: &str, reason: String| RegistryError::InvalidEntry {
            username: username.to_owned(),
            reason,
        };

        let username = Username::new(self.username.clone())
            .map_err(|err| invalid(&self.username, err.to_string()))?;
        let credential = CredentialHash::parse(self.password_hash)
            .map_err(|err| invalid(&self.username, err.to_string()))?;
        let display_name = DisplayName::new(self.display_name)
            .map_err(|err| invalid(&self.username, err.to_string()))?;
        let role =
            Role::new(self.role).map_err(|err| invalid(&self.username, err.to_string()))?;

        Ok(UserRecord::new(username, credential, display_name, role))
    }
}

/// Static user registry loaded from a JSON file.
#[derive(Debug)]
pub struct FileUserDirectory {
    users: HashMap<String, UserRecord>,
}

impl FileUserDirectory {
    /// Load and validate the registry file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_owned(),
            source,
        })?;
        let entries: Vec<RegistryEntryDto> =
            serde_json::from_str(&raw).map_err(|source| RegistryError::Parse {
                path: path.to_owned(),
                source,
            })?;

        let directory = Self::from_entries(entries)?;
        info!(
            path = %path.display(),
            users = directory.len(),
            "user registry loaded"
        );
        Ok(directory)
    }

    fn from_entries(entries: Vec<RegistryEntryDto>) -> Result<Self, RegistryError> {
        let mut users = HashMap::with_capacity(entries.len());
        for entry in entries {
            let record = entry.into_record()?;
            let key = record.username().to_string();
            if users.insert(key.clone(), record).is_some() {
                return Err(RegistryError::DuplicateUsername { username: key });
            }
        }
        Ok(Self { users })
    }

    /// Number of registered operators.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the registry holds no operators.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserDirectory for FileUserDirectory {
    fn find(&self, username: &str) -> Option<UserRecord> {
        self.users.get(username).cloned()
    }
}
