//! Registry-backed implementation of the [`LoginService`] port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::auth::{CredentialHash, LoginCredentials};
use crate::domain::ports::{LoginService, UserDirectory};
use crate::domain::user::SessionIdentity;
use crate::domain::Error;

/// Authenticates submitted credentials against a [`UserDirectory`].
///
/// Both rejection causes (unknown username, wrong password) produce the same
/// generic error, and an unknown username still performs one hash
/// verification against a fixed dummy hash so the two paths take comparable
/// time.
pub struct DirectoryLoginService {
    directory: Arc<dyn UserDirectory>,
}

impl DirectoryLoginService {
    /// Build a service over the given directory.
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    fn rejected() -> Error {
        Error::unauthorized("invalid credentials")
    }
}

#[async_trait]
impl LoginService for DirectoryLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<SessionIdentity, Error> {
        match self.directory.find(credentials.username()) {
            Some(record) if record.credential().matches(credentials.password()) => {
                info!(username = %record.username(), "login accepted");
                Ok(SessionIdentity::from(&record))
            }
            Some(_) => {
                // Do not log which field failed, let alone its value.
                info!("login rejected");
                Err(Self::rejected())
            }
            None => {
                CredentialHash::timing_shield().matches(credentials.password());
                info!("login rejected");
                Err(Self::rejected())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{FixtureUserDirectory, MockUserDirectory};
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("gm", "secret", true)]
    #[case("gm", "wrong", false)]
    #[case("GM", "secret", false)]
    #[case("stranger", "secret", false)]
    #[case("", "", false)]
    #[tokio::test]
    async fn authenticates_only_the_exact_registered_pair(
        #[case] username: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let service = DirectoryLoginService::new(Arc::new(FixtureUserDirectory));
        let result = service
            .authenticate(&LoginCredentials::new(username, password))
            .await;
        match (should_succeed, result) {
            (true, Ok(identity)) => {
                assert_eq!(identity.username().as_ref(), "gm");
                assert_eq!(identity.display_name().as_ref(), "Game Master");
                assert_eq!(identity.role().as_ref(), "admin");
            }
            (false, Err(err)) => {
                assert_eq!(err.code(), ErrorCode::Unauthorized);
                assert_eq!(err.message(), "invalid credentials");
            }
            (true, Err(err)) => panic!("expected success, got error: {err:?}"),
            (false, Ok(identity)) => panic!("expected failure, got identity: {identity:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_and_wrong_password_rejections_are_identical() {
        let service = DirectoryLoginService::new(Arc::new(FixtureUserDirectory));
        let unknown = service
            .authenticate(&LoginCredentials::new("stranger", "secret"))
            .await
            .expect_err("unknown username");
        let wrong = service
            .authenticate(&LoginCredentials::new("gm", "wrong"))
            .await
            .expect_err("wrong password");
        assert_eq!(unknown.code(), wrong.code());
        assert_eq!(unknown.message(), wrong.message());
    }

    #[tokio::test]
    async fn consults_the_directory_once_per_attempt() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find()
            .times(1)
            .returning(|_| None);
        let service = DirectoryLoginService::new(Arc::new(directory));
        let result = service
            .authenticate(&LoginCredentials::new("gm", "secret"))
            .await;
        assert!(result.is_err());
    }
}
