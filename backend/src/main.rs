//! Backend entry-point: wires the session-auth API, the guarded map access
//! layer, and the health probes.

mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultEnv, Env};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::domain::ports::{FixtureUserDirectory, UserDirectory};
use backend::domain::{DirectoryLoginService, MapAccess, MapSurface};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{session_settings_from_env, BuildMode};
use backend::inbound::http::state::HttpState;
use backend::outbound::{FileUserDirectory, MapOwner};
use server::{create_server, ServerConfig};

const BIND_ADDR_ENV: &str = "BIND_ADDR";
const BIND_ADDR_DEFAULT: &str = "0.0.0.0:8080";
const REGISTRY_ENV: &str = "USER_REGISTRY_FILE";

fn bind_addr_from_env(env: &impl Env) -> std::io::Result<SocketAddr> {
    let raw = env
        .string(BIND_ADDR_ENV)
        .unwrap_or_else(|| BIND_ADDR_DEFAULT.to_owned());
    raw.parse()
        .map_err(|err| std::io::Error::other(format!("invalid {BIND_ADDR_ENV}='{raw}': {err}")))
}

fn user_directory_from_env(env: &impl Env) -> std::io::Result<Arc<dyn UserDirectory>> {
    match env.string(REGISTRY_ENV) {
        Some(path) => {
            let directory = FileUserDirectory::load(&path).map_err(std::io::Error::other)?;
            Ok(Arc::new(directory))
        }
        None if cfg!(debug_assertions) => {
            warn!("{REGISTRY_ENV} not set; using the gm/secret fixture directory (dev only)");
            Ok(Arc::new(FixtureUserDirectory))
        }
        None => Err(std::io::Error::other(format!(
            "missing required environment variable: {REGISTRY_ENV}"
        ))),
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::default();
    let settings = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let bind_addr = bind_addr_from_env(&env)?;
    let directory = user_directory_from_env(&env)?;

    // The map core installs an empty surface at boot; authored overlays are
    // composed onto it through the guarded layer endpoints.
    let owner = Arc::new(MapOwner::new());
    owner.install(MapSurface::new());

    let http_state = web::Data::new(HttpState::new(
        Arc::new(DirectoryLoginService::new(directory)),
        MapAccess::new(owner),
    ));
    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(
        settings.key,
        settings.cookie_secure,
        settings.same_site,
        bind_addr,
    );

    create_server(health_state, config, http_state)?.await
}
