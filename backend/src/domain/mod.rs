//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities used by the HTTP adapter
//! and the map access layer. Keep types immutable and document invariants
//! and serialisation contracts (serde) in each type's Rustdoc.

pub mod auth;
pub mod error;
pub mod login;
pub mod map;
pub mod map_guard;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{CredentialHash, CredentialHashError, LoginCredentials};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::login::DirectoryLoginService;
pub use self::map::{Layer, LayerId, LayerKind, MapHandle, MapSurface, MapValidationError};
pub use self::map_guard::{LayerChange, LayerToggle, MapAccess, MapUnavailable};
pub use self::trace_id::TraceId;
pub use self::user::{
    DisplayName, Role, SessionIdentity, UserRecord, UserValidationError, Username, ADMIN_ROLE,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
