//! Backend entry-point: loads settings, prepares storage and serves the
//! administration API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use hospadmin::inbound::http::health::HealthState;
use hospadmin::inbound::http::session_config::{BuildMode, session_settings};
use server::{IdentityWiring, ServerConfig, ServerSettings, create_server, prepare_storage};

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

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?;
    let session = session_settings(
        &settings.session_toggles(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(|e| std::io::Error::other(format!("invalid session configuration: {e}")))?;

    let identity = match settings
        .identity_provider()
        .map_err(|e| std::io::Error::other(e.to_string()))?
    {
        Some(provider) => Some(IdentityWiring::start(
            provider,
            settings.sync_queue_capacity(),
        )?),
        None => {
            warn!("no identity_base_url configured; using fixture sign-in");
            None
        }
    };
    let storage = prepare_storage(
        settings.database_url.as_deref(),
        settings.db_pool_size(),
        identity.as_ref(),
    )
    .await?;
    let config =
        ServerConfig::new(session, settings.bind_addr(), storage).with_identity(identity);

    let health_state = web::Data::new(HealthState::new());
    let bind_addr = config.bind_addr();
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
