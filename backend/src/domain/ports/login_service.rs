//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! registry. This keeps HTTP handler tests deterministic because they can
//! substitute a test double instead of wiring a registry file.

use async_trait::async_trait;

use crate::domain::auth::LoginCredentials;
use crate::domain::user::SessionIdentity;
use crate::domain::Error;

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated identity.
    ///
    /// Rejections carry [`crate::domain::ErrorCode::Unauthorized`] with a
    /// deliberately generic message; callers must not learn which of the two
    /// fields was wrong.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<SessionIdentity, Error>;
}
