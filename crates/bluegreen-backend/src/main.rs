//! Blue-green backend binary.
//!
//! - Config: `BACKEND_CONFIG=path/to/backend.yaml` (defaults when unset)
//! - Logging: `RUST_LOG` (defaults to `info`)
//! - Shutdown: Ctrl-C / SIGTERM closes the readiness gate, then drains

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use bluegreen_backend::{app_state::AppState, config, readiness::Readiness, router};
use bluegreen_core::error::{BackendError, Result};

const CONFIG_ENV: &str = "BACKEND_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cfg = match std::env::var(CONFIG_ENV) {
        Ok(path) => config::load_from_file(&path)?,
        Err(_) => config::BackendConfig::default(),
    };
    let listen = cfg.server.listen_addr()?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, version = state.version(), "backend starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| BackendError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.readiness()))
        .await
        .map_err(|e| BackendError::Internal(format!("server failed: {e}")))?;

    tracing::info!("backend stopped");
    Ok(())
}

async fn shutdown_signal(readiness: Arc<Readiness>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    readiness.set_ready(false);
    tracing::info!("signal received, starting graceful shutdown");
}
