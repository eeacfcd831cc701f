use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use club_portal::config::AppConfig;
use club_portal::database::backend::RestBackend;
use club_portal::web::{self, session::SessionStore, state::AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    let backend = match RestBackend::new(&config.baas_url, &config.baas_anon_key, config.baas_timeout)
    {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "backend client setup failed");
            std::process::exit(1);
        }
    };
    info!(
        baas_url = %config.baas_url,
        build_id = env!("CLUB_PORTAL_BUILD_ID"),
        "backend client ready"
    );

    let state = AppState::new(Arc::new(backend), SessionStore::new(config.session_idle));
    let app = web::router(state);

    // Bind with a fallback port.
    let addr = match format!("{}:{}", config.host, config.port).parse::<SocketAddr>() {
        Ok(a) => a,
        Err(e) => {
            error!(host = %config.host, port = config.port, error = %e, "invalid bind address");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback = SocketAddr::new(addr.ip(), config.port.saturating_add(1));
            warn!(%addr, %fallback, error = %e, "bind failed, trying fallback port");
            match tokio::net::TcpListener::bind(fallback).await {
                Ok(l) => l,
                Err(e) => {
                    error!(%fallback, error = %e, "fallback bind failed");
                    std::process::exit(1);
                }
            }
        }
    };

    match listener.local_addr() {
        Ok(bound) => info!("club portal listening on http://{}", bound),
        Err(e) => warn!(error = %e, "could not read bound address"),
    }

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
