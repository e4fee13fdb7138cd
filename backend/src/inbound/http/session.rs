//! Session helpers keeping HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: signing an identity in, reading it back,
//! gating on a role, and destroying the session.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, SessionIdentity};

pub(crate) const IDENTITY_KEY: &str = "identity";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity, renewing the session first.
    ///
    /// The renew issues a fresh cookie identifier, so a login over an
    /// existing session overwrites the identity without inheriting the old
    /// cookie.
    pub fn sign_in(&self, identity: &SessionIdentity) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(IDENTITY_KEY, identity)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current identity, if one is present and readable.
    ///
    /// An unreadable identity (tampered or stale cookie payload) is treated
    /// as anonymous rather than as an error, matching the auth-status
    /// contract of never failing a pure read.
    pub fn identity(&self) -> Option<SessionIdentity> {
        match self.0.get::<SessionIdentity>(IDENTITY_KEY) {
            Ok(identity) => identity,
            Err(error) => {
                warn!(%error, "unreadable session identity; treating as anonymous");
                None
            }
        }
    }

    /// Require an authenticated identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<SessionIdentity, Error> {
        self.identity()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require an authenticated identity carrying `role`, or fail with
    /// `401`/`403`.
    pub fn require_role(&self, role: &str) -> Result<SessionIdentity, Error> {
        let identity = self.require_identity()?;
        if identity.role().as_ref() == role {
            Ok(identity)
        } else {
            Err(Error::forbidden(format!("{role} role required")))
        }
    }

    /// Destroy the session via the store's destroy operation.
    ///
    /// Cookie-backed storage cannot fail here, but the fallible signature is
    /// part of the contract so a server-side store can surface destroy
    /// failures to the logout handler unchanged.
    pub fn sign_out(&self) -> Result<(), Error> {
        self.0.purge();
        Ok(())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
