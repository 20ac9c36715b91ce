//! Mestres da Matemática backend entrypoint wiring REST, SSE, and storage layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod game;
mod routes;
mod services;

use config::{AppConfig, StorageBackend, StorageSettings};
use dao::result_store::ResultStore;
use dao::storage::StorageError;
use game::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let storage = config.storage().clone();

    let app_state = AppState::new(config);

    tokio::spawn(services::storage_supervisor::run(app_state.clone(), move || {
        connect_store(storage.clone())
    }));
    tokio::spawn(broadcast_degraded_changes(app_state.clone()));

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Build the result store selected by the configuration.
async fn connect_store(settings: StorageSettings) -> Result<Arc<dyn ResultStore>, StorageError> {
    match settings.backend {
        #[cfg(feature = "file-store")]
        StorageBackend::File => {
            let store = dao::result_store::file::FileResultStore::open(settings.data_dir).await?;
            Ok(Arc::new(store))
        }
        #[cfg(all(feature = "couch-store", feature = "file-store"))]
        StorageBackend::CouchWithFallback => {
            let couch_config = dao::result_store::couchdb::CouchConfig::from_env()?;
            let remote = dao::result_store::couchdb::CouchResultStore::connect(couch_config).await?;
            let local = dao::result_store::file::FileResultStore::open(settings.data_dir).await?;
            Ok(Arc::new(dao::result_store::FallbackResultStore::new(
                Arc::new(remote),
                Arc::new(local),
            )))
        }
        #[allow(unreachable_patterns)]
        other => Err(StorageError::unavailable(
            format!("storage backend {other:?} is not compiled in"),
            std::io::Error::new(std::io::ErrorKind::Unsupported, "backend disabled"),
        )),
    }
}

/// Mirror degraded-mode changes onto the public SSE stream.
async fn broadcast_degraded_changes(state: SharedState) {
    let mut watcher = state.degraded_watcher();
    loop {
        if watcher.changed().await.is_err() {
            break;
        }
        let degraded = *watcher.borrow_and_update();
        services::sse_events::broadcast_system_status(state.sse(), degraded);
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
