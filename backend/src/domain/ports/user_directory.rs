//! Driven port for the static user registry.

use std::sync::OnceLock;

use crate::domain::auth::CredentialHash;
use crate::domain::user::{DisplayName, Role, UserRecord, Username};

/// Read-only lookup over the registered operators.
///
/// Lookups take the raw submitted string because login inputs carry no
/// format constraints; a string that would not validate as a [`Username`]
/// simply matches nothing.
#[cfg_attr(test, mockall::automock)]
pub trait UserDirectory: Send + Sync {
    /// Find the record whose username equals `username` exactly
    /// (case-sensitive).
    fn find(&self, username: &str) -> Option<UserRecord>;
}

/// In-memory directory holding the development operator `gm`/`secret`.
///
/// Used by tests and as the debug-build fallback when no registry file is
/// configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

impl FixtureUserDirectory {
    fn record() -> &'static UserRecord {
        static RECORD: OnceLock<UserRecord> = OnceLock::new();
        RECORD.get_or_init(|| {
            let credential = match CredentialHash::derive("secret") {
                Ok(hash) => hash,
                Err(err) => panic!("failed to derive fixture credential: {err}"),
            };
            UserRecord::new(
                Username::new("gm").unwrap_or_else(|err| panic!("fixture username: {err}")),
                credential,
                DisplayName::new("Game Master")
                    .unwrap_or_else(|err| panic!("fixture display name: {err}")),
                Role::new("admin").unwrap_or_else(|err| panic!("fixture role: {err}")),
            )
        })
    }
}

impl UserDirectory for FixtureUserDirectory {
    fn find(&self, username: &str) -> Option<UserRecord> {
        let record = Self::record();
        (record.username().as_ref() == username).then(|| record.clone())
    }
}
