//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::LoginService;
use crate::domain::MapAccess;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Authentication use-case port.
    pub login: Arc<dyn LoginService>,
    /// Guarded accessor for the shared map surface.
    pub map: MapAccess,
}

impl HttpState {
    /// Construct state from the login port and map guard.
    pub fn new(login: Arc<dyn LoginService>, map: MapAccess) -> Self {
        Self { login, map }
    }
}
