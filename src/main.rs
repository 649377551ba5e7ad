use std::sync::Arc;

use vocab_backend::config::Config;
use vocab_backend::db::Database;
use vocab_backend::state::AppState;
use vocab_backend::{create_app, logging};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

    let db: Option<Arc<Database>> = match Database::from_env().await {
        Ok(db) => Some(db),
        Err(err) => {
            // Health endpoints keep serving so operators can see the failure.
            tracing::warn!(error = %err, "database initialization failed, starting degraded");
            None
        }
    };

    let addr = config.bind_addr();
    let state = AppState::new(config, db);
    let app = create_app(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "failed to bind listener");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "vocab-backend listening");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %err, "server error");
        std::process::exit(1);
    }

    tracing::info!("shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .unwrap_or_else(|err| tracing::error!(error = %err, "ctrl-c handler failed"));
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "SIGTERM handler failed"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
