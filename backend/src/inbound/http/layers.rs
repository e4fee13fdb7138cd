//! Map layer API handlers.
//!
//! ```text
//! GET    /api/v1/map/layers
//! PUT    /api/v1/map/layers/{id}
//! DELETE /api/v1/map/layers/{id}
//! POST   /api/v1/map/layers/{id}/toggle
//! ```
//!
//! Reads are public; mutations require an authenticated session with the
//! `admin` role. Every operation goes through the map access guard, so an
//! absent surface surfaces as `503 service_unavailable` rather than a fault.

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, Layer, LayerChange, LayerId, LayerKind, LayerToggle, MapUnavailable,
    MapValidationError, ADMIN_ROLE,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Layer descriptor accepted by add and toggle requests.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayerRequest {
    /// Kind of overlay to compose.
    pub kind: LayerKind,
    /// Optional presentation label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl LayerRequest {
    fn into_layer(self, id: LayerId) -> Layer {
        let layer = Layer::new(id, self.kind);
        match self.label {
            Some(label) => layer.with_label(label),
            None => layer,
        }
    }
}

/// Outcome body for layer mutations.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayerChangeView {
    /// Overlay identifier the operation targeted.
    #[schema(example = "kingdom-borders")]
    pub id: String,
    /// What happened: `added`, `already-present`, `removed`, or `absent`.
    #[schema(example = "added")]
    pub change: String,
}

fn change_view(id: &LayerId, change: &str) -> LayerChangeView {
    LayerChangeView {
        id: id.to_string(),
        change: change.to_owned(),
    }
}

fn map_unavailable(_: MapUnavailable) -> Error {
    Error::service_unavailable("map surface is not available")
}

fn parse_layer_id(raw: String) -> Result<LayerId, Error> {
    LayerId::new(raw).map_err(|err: MapValidationError| Error::invalid_request(err.to_string()))
}

/// List the overlays currently composed on the map, ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/map/layers",
    responses(
        (status = 200, description = "Composed layers", body = [Layer]),
        (status = 503, description = "Map surface unavailable", body = Error)
    ),
    tags = ["map"],
    operation_id = "listLayers",
    security([])
)]
#[get("/map/layers")]
pub async fn list_layers(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Layer>>> {
    let layers = state.map.snapshot().map_err(map_unavailable)?;
    Ok(web::Json(layers))
}

/// Add a layer to the map; a no-op when the id is already composed.
#[utoipa::path(
    put,
    path = "/api/v1/map/layers/{id}",
    request_body = LayerRequest,
    responses(
        (status = 200, description = "Add outcome", body = LayerChangeView),
        (status = 400, description = "Invalid layer id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Map surface unavailable", body = Error)
    ),
    params(("id" = String, Path, description = "Layer identifier (lowercase slug)")),
    tags = ["map"],
    operation_id = "addLayer"
)]
#[put("/map/layers/{id}")]
pub async fn add_layer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<LayerRequest>,
) -> ApiResult<web::Json<LayerChangeView>> {
    session.require_role(ADMIN_ROLE)?;
    let id = parse_layer_id(path.into_inner())?;
    let layer = payload.into_inner().into_layer(id.clone());
    let change = state.map.add_layer(layer).map_err(map_unavailable)?;
    let outcome = match change {
        LayerChange::Applied => "added",
        LayerChange::Unchanged => "already-present",
    };
    Ok(web::Json(change_view(&id, outcome)))
}

/// Remove a layer from the map; a no-op when the id is not composed.
#[utoipa::path(
    delete,
    path = "/api/v1/map/layers/{id}",
    responses(
        (status = 200, description = "Remove outcome", body = LayerChangeView),
        (status = 400, description = "Invalid layer id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Map surface unavailable", body = Error)
    ),
    params(("id" = String, Path, description = "Layer identifier (lowercase slug)")),
    tags = ["map"],
    operation_id = "removeLayer"
)]
#[delete("/map/layers/{id}")]
pub async fn remove_layer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<LayerChangeView>> {
    session.require_role(ADMIN_ROLE)?;
    let id = parse_layer_id(path.into_inner())?;
    let change = state.map.remove_layer(&id).map_err(map_unavailable)?;
    let outcome = match change {
        LayerChange::Applied => "removed",
        LayerChange::Unchanged => "absent",
    };
    Ok(web::Json(change_view(&id, outcome)))
}

/// Toggle a layer: remove it when composed, add it otherwise.
#[utoipa::path(
    post,
    path = "/api/v1/map/layers/{id}/toggle",
    request_body = LayerRequest,
    responses(
        (status = 200, description = "Toggle outcome", body = LayerChangeView),
        (status = 400, description = "Invalid layer id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Map surface unavailable", body = Error)
    ),
    params(("id" = String, Path, description = "Layer identifier (lowercase slug)")),
    tags = ["map"],
    operation_id = "toggleLayer"
)]
#[post("/map/layers/{id}/toggle")]
pub async fn toggle_layer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<LayerRequest>,
) -> ApiResult<web::Json<LayerChangeView>> {
    session.require_role(ADMIN_ROLE)?;
    let id = parse_layer_id(path.into_inner())?;
    let layer = payload.into_inner().into_layer(id.clone());
    let toggle = state.map.toggle_layer(layer).map_err(map_unavailable)?;
    let outcome = match toggle {
        LayerToggle::Added => "added",
        LayerToggle::Removed => "removed",
    };
    Ok(web::Json(change_view(&id, outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{FixtureMapProvider, FixtureUserDirectory, MapProvider};
    use crate::domain::{DirectoryLoginService, MapAccess};
    use crate::inbound::http::auth::{login, LoginRequest};
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web, App};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    fn test_app(
        provider: Arc<dyn MapProvider>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState::new(
            Arc::new(DirectoryLoginService::new(Arc::new(FixtureUserDirectory))),
            MapAccess::new(provider),
        );
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(login)
                    .service(list_layers)
                    .service(add_layer)
                    .service(remove_layer)
                    .service(toggle_layer),
            )
    }

    async fn admin_cookie(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) -> actix_web::cookie::Cookie<'static> {
        let login_req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                username: "gm".into(),
                password: "secret".into(),
            })
            .to_request();
        let login_res = actix_test::call_service(app, login_req).await;
        assert!(login_res.status().is_success());
        login_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    fn marker_body() -> Value {
        serde_json::json!({ "kind": "marker", "label": "The Prancing Pony" })
    }

    #[actix_web::test]
    async fn add_then_list_then_remove() {
        let app =
            actix_test::init_service(test_app(Arc::new(FixtureMapProvider::installed()))).await;
        let cookie = admin_cookie(&app).await;

        let add_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/map/layers/inn")
                .cookie(cookie.clone())
                .set_json(marker_body())
                .to_request(),
        )
        .await;
        assert_eq!(add_res.status(), StatusCode::OK);
        let body: LayerChangeView = actix_test::read_body_json(add_res).await;
        assert_eq!(body.change, "added");

        let list_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/map/layers")
                .to_request(),
        )
        .await;
        assert_eq!(list_res.status(), StatusCode::OK);
        let layers: Value = actix_test::read_body_json(list_res).await;
        let first = &layers.as_array().expect("array")[0];
        assert_eq!(first.get("id").and_then(Value::as_str), Some("inn"));
        assert_eq!(first.get("kind").and_then(Value::as_str), Some("marker"));
        assert_eq!(
            first.get("label").and_then(Value::as_str),
            Some("The Prancing Pony")
        );

        let remove_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/v1/map/layers/inn")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body: LayerChangeView = actix_test::read_body_json(remove_res).await;
        assert_eq!(body.change, "removed");
    }

    #[actix_web::test]
    async fn repeated_add_reports_already_present() {
        let app =
            actix_test::init_service(test_app(Arc::new(FixtureMapProvider::installed()))).await;
        let cookie = admin_cookie(&app).await;

        for expected in ["added", "already-present"] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::put()
                    .uri("/api/v1/map/layers/inn")
                    .cookie(cookie.clone())
                    .set_json(marker_body())
                    .to_request(),
            )
            .await;
            let body: LayerChangeView = actix_test::read_body_json(res).await;
            assert_eq!(body.change, expected);
        }
    }

    #[actix_web::test]
    async fn toggle_alternates_between_added_and_removed() {
        let app =
            actix_test::init_service(test_app(Arc::new(FixtureMapProvider::installed()))).await;
        let cookie = admin_cookie(&app).await;

        for expected in ["added", "removed", "added"] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/map/layers/inn/toggle")
                    .cookie(cookie.clone())
                    .set_json(marker_body())
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK);
            let body: LayerChangeView = actix_test::read_body_json(res).await;
            assert_eq!(body.change, expected);
        }
    }

    #[actix_web::test]
    async fn mutations_require_a_session() {
        let app =
            actix_test::init_service(test_app(Arc::new(FixtureMapProvider::installed()))).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/map/layers/inn")
                .set_json(marker_body())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case("Inn")]
    #[case("-inn")]
    #[actix_web::test]
    async fn invalid_layer_ids_are_rejected(#[case] raw: &str) {
        let app =
            actix_test::init_service(test_app(Arc::new(FixtureMapProvider::installed()))).await;
        let cookie = admin_cookie(&app).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/map/layers/{raw}"))
                .cookie(cookie)
                .set_json(marker_body())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn absent_map_reports_service_unavailable() {
        let app = actix_test::init_service(test_app(Arc::new(FixtureMapProvider::absent()))).await;
        let cookie = admin_cookie(&app).await;

        let list_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/map/layers")
                .to_request(),
        )
        .await;
        assert_eq!(list_res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = actix_test::read_body_json(list_res).await;
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("service_unavailable")
        );

        let toggle_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/map/layers/inn/toggle")
                .cookie(cookie)
                .set_json(marker_body())
                .to_request(),
        )
        .await;
        assert_eq!(toggle_res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
