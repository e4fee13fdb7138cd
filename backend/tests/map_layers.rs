//! Layer endpoints driven through HTTP against the real map owner,
//! including role gating and the unavailable-map path.

use std::io::Write;
use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web, App};
use serde_json::{json, Value};

use backend::domain::{CredentialHash, DirectoryLoginService, MapAccess, MapSurface};
use backend::inbound::http::auth::login;
use backend::inbound::http::layers::{add_layer, list_layers, remove_layer, toggle_layer};
use backend::inbound::http::state::HttpState;
use backend::outbound::{FileUserDirectory, MapOwner};

fn registry_file() -> tempfile::NamedTempFile {
    let gm_hash = CredentialHash::derive("secret").expect("derive hash");
    let scribe_hash = CredentialHash::derive("quill").expect("derive hash");
    let registry = json!([
        {
            "username": "gm",
            "passwordHash": gm_hash.as_str(),
            "displayName": "Game Master",
            "role": "admin"
        },
        {
            "username": "scribe",
            "passwordHash": scribe_hash.as_str(),
            "displayName": "Table Scribe",
            "role": "viewer"
        }
    ]);
    let mut file = tempfile::NamedTempFile::new().expect("create registry file");
    file.write_all(registry.to_string().as_bytes())
        .expect("write registry");
    file
}

fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

fn test_app(
    owner: Arc<MapOwner>,
    directory: FileUserDirectory,
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
        Arc::new(DirectoryLoginService::new(Arc::new(directory))),
        MapAccess::new(owner),
    );
    App::new()
        .app_data(web::Data::new(state))
        .service(
            web::scope("/api/v1")
                .wrap(session_middleware())
                .service(login)
                .service(list_layers)
                .service(add_layer)
                .service(remove_layer)
                .service(toggle_layer),
        )
}

async fn login_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> Cookie<'static> {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

#[actix_web::test]
async fn admin_toggles_layers_and_the_list_reflects_it() {
    let owner = Arc::new(MapOwner::new());
    owner.install(MapSurface::new());
    let registry = registry_file();
    let directory = FileUserDirectory::load(registry.path()).expect("load registry");
    let app = actix_test::init_service(test_app(owner, directory)).await;
    let cookie = login_cookie(&app, "gm", "secret").await;

    let toggle_on = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/map/layers/journey-north/toggle")
            .cookie(cookie.clone())
            .set_json(json!({ "kind": "journey-path", "label": "North road" }))
            .to_request(),
    )
    .await;
    assert_eq!(toggle_on.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(toggle_on).await;
    assert_eq!(body.get("change").and_then(Value::as_str), Some("added"));

    let list_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/map/layers")
            .to_request(),
    )
    .await;
    let layers: Value = actix_test::read_body_json(list_res).await;
    assert_eq!(layers.as_array().map(Vec::len), Some(1));

    // Toggling again removes the layer: the toggle is its own inverse.
    let toggle_off = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/map/layers/journey-north/toggle")
            .cookie(cookie)
            .set_json(json!({ "kind": "journey-path" }))
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(toggle_off).await;
    assert_eq!(body.get("change").and_then(Value::as_str), Some("removed"));

    let list_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/map/layers")
            .to_request(),
    )
    .await;
    let layers: Value = actix_test::read_body_json(list_res).await;
    assert_eq!(layers.as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn non_admin_sessions_are_forbidden_from_mutations() {
    let owner = Arc::new(MapOwner::new());
    owner.install(MapSurface::new());
    let registry = registry_file();
    let directory = FileUserDirectory::load(registry.path()).expect("load registry");
    let app = actix_test::init_service(test_app(owner, directory)).await;
    let cookie = login_cookie(&app, "scribe", "quill").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/map/layers/inn")
            .cookie(cookie)
            .set_json(json!({ "kind": "marker" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("forbidden"));
}

#[actix_web::test]
async fn clearing_the_owner_surfaces_as_503_until_reinstalled() {
    let owner = Arc::new(MapOwner::new());
    owner.install(MapSurface::new());
    let registry = registry_file();
    let directory = FileUserDirectory::load(registry.path()).expect("load registry");
    let app = actix_test::init_service(test_app(owner.clone(), directory)).await;
    let cookie = login_cookie(&app, "gm", "secret").await;

    owner.clear();
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/map/layers/inn")
            .cookie(cookie.clone())
            .set_json(json!({ "kind": "marker" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Handlers fetch the handle per request, so a reinstall heals the API
    // without restarting anything.
    owner.install(MapSurface::new());
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/map/layers/inn")
            .cookie(cookie)
            .set_json(json!({ "kind": "marker" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body.get("change").and_then(Value::as_str), Some("added"));
}
