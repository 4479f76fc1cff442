//! HubShift HTTP server
//!
//! axum surface over the engine commands: JSON API under `/api`, a liveness
//! probe at `/health`, and guarded page navigations for everything else.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;

pub use config::Settings;
pub use routes::router;
pub use state::AppState;

use hubshift_core::errors::{ExError, ExErrorKind};
use hubshift_engine::{DisabledVerifier, GoogleTokenVerifier, IdentityVerifier};
use hubshift_store::migrations::apply_migrations;
use hubshift_store::{db, PgRepo, Repository};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Connect, migrate and serve until Ctrl+C or SIGTERM
pub async fn serve(settings: Settings) -> Result<(), ExError> {
    let pool = db::connect(&settings.database_url).await?;
    let applied = apply_migrations(&pool).await?;
    tracing::info!(applied = applied.len(), "database schema up to date");

    let repo: Arc<dyn Repository> = Arc::new(PgRepo::new(pool));
    let verifier: Arc<dyn IdentityVerifier> = match settings.google_client_id.as_deref() {
        Some(client_id) if !client_id.trim().is_empty() => {
            Arc::new(GoogleTokenVerifier::new(client_id.trim())?)
        }
        _ => {
            tracing::warn!("GOOGLE_CLIENT_ID not set; Google sign-in disabled");
            Arc::new(DisabledVerifier)
        }
    };
    if settings.enable_test_endpoints {
        tracing::warn!("test endpoints enabled");
    }

    let addr = settings.bind_addr()?;
    let state = AppState::new(repo, verifier, settings);

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        ExError::new(ExErrorKind::Configuration)
            .with_op("serve")
            .with_message(format!("cannot bind {}: {}", addr, e))
    })?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("serve")
                .with_message(e.to_string())
        })?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
