//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: auth endpoints, map layer endpoints, and health probes,
//! plus the session cookie security scheme. The generated document backs
//! Swagger UI in debug builds and is exported via `cargo run --bin
//! openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Campaign map backend API",
        description = "HTTP interface for session-authenticated map authoring and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::auth_status,
        crate::inbound::http::layers::list_layers,
        crate::inbound::http::layers::add_layer,
        crate::inbound::http::layers::remove_layer,
        crate::inbound::http::layers::toggle_layer,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::Layer,
        crate::domain::LayerKind,
        crate::inbound::http::auth::LoginRequest,
        crate::inbound::http::auth::LoginSuccess,
        crate::inbound::http::auth::AuthAck,
        crate::inbound::http::auth::AuthStatusView,
        crate::inbound::http::layers::LayerRequest,
        crate::inbound::http::layers::LayerChangeView,
    ))
)]
pub struct ApiDoc;
