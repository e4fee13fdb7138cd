//! Session-auth API handlers.
//!
//! ```text
//! POST /api/v1/login       {"username":"gm","password":"secret"}
//! POST /api/v1/logout
//! GET  /api/v1/auth-status
//! ```
//!
//! The wire shapes here are fixed by the client contract: login and logout
//! answer with a `success`/`message` envelope (the login success adds the
//! display name and role), and auth-status reports a plain three-field view.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{Error, ErrorCode, LoginCredentials, SessionIdentity};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Login request body for `POST /api/v1/login`.
///
/// No length or format constraints apply; any pair of strings is a valid
/// attempt.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Registry lookup key.
    pub username: String,
    /// Shared secret, verified against the stored hash.
    pub password: String,
}

/// Success body for `POST /api/v1/login`.
///
/// `username` carries the display name, not the lookup key.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginSuccess {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
    /// Display name of the authenticated user.
    #[schema(example = "Game Master")]
    pub username: String,
    /// Role of the authenticated user.
    #[schema(example = "admin")]
    pub role: String,
}

/// Generic acknowledgement body used by login failures and logout.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthAck {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable outcome; generic on failure by design.
    pub message: String,
}

/// Body for `GET /api/v1/auth-status`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthStatusView {
    /// Whether the session carries an authenticated identity.
    pub authenticated: bool,
    /// Display name of the authenticated user, or `null`.
    pub username: Option<String>,
    /// Role of the authenticated user, or `null`.
    pub role: Option<String>,
}

impl From<Option<SessionIdentity>> for AuthStatusView {
    fn from(identity: Option<SessionIdentity>) -> Self {
        match identity {
            Some(identity) => Self {
                authenticated: true,
                username: Some(identity.display_name().to_string()),
                role: Some(identity.role().to_string()),
            },
            None => Self {
                authenticated: false,
                username: None,
                role: None,
            },
        }
    }
}

/// Authenticate a user and establish a session.
///
/// A login over an already-authenticated session is permitted and replaces
/// the identity; the session is renewed either way.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginSuccess,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid credentials", body = AuthAck),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials = LoginCredentials::new(username, password);

    match state.login.authenticate(&credentials).await {
        Ok(identity) => {
            session.sign_in(&identity)?;
            Ok(HttpResponse::Ok().json(LoginSuccess {
                success: true,
                message: "Login successful".to_owned(),
                username: identity.display_name().to_string(),
                role: identity.role().to_string(),
            }))
        }
        Err(error) if matches!(error.code(), ErrorCode::Unauthorized) => {
            Ok(HttpResponse::Unauthorized().json(AuthAck {
                success: false,
                message: "Invalid credentials".to_owned(),
            }))
        }
        Err(error) => Err(error),
    }
}

pub(crate) fn logout_response(outcome: Result<(), Error>) -> HttpResponse {
    match outcome {
        Ok(()) => HttpResponse::Ok().json(AuthAck {
            success: true,
            message: "Logout successful".to_owned(),
        }),
        Err(error) => {
            // The session is now in a store-defined state; the client must
            // treat the outcome as ambiguous.
            error!(%error, "session destroy failed");
            HttpResponse::InternalServerError().json(AuthAck {
                success: false,
                message: "Logout failed".to_owned(),
            })
        }
    }
}

/// Destroy the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Logout success", body = AuthAck),
        (status = 500, description = "Session destroy failed", body = AuthAck)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    logout_response(session.sign_out())
}

/// Report the session's authentication state.
///
/// Pure read: a missing, expired, or unreadable session is reported as
/// anonymous, never as an error.
#[utoipa::path(
    get,
    path = "/api/v1/auth-status",
    responses(
        (status = 200, description = "Current authentication state", body = AuthStatusView)
    ),
    tags = ["auth"],
    operation_id = "authStatus",
    security([])
)]
#[get("/auth-status")]
pub async fn auth_status(session: SessionContext) -> web::Json<AuthStatusView> {
    web::Json(AuthStatusView::from(session.identity()))
}
