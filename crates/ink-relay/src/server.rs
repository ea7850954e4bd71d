use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use ink_config::InkConfig;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::eviction::{spawn_reaper, EvictionPolicy, UnattachedTtl};
use crate::relay::Relay;
use crate::routes;

/// Shared state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Relay,
    /// Scheme for QR links when the request does not specify one.
    pub public_scheme: Arc<str>,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState, max_payload_bytes: usize) -> Router {
    Router::new()
        .route("/index", get(routes::index))
        .route("/qrcode", get(routes::qrcode))
        .route("/watch", get(routes::watch))
        .route("/ink", get(routes::ink))
        .route("/ink-submit", post(routes::ink_submit))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(max_payload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener, start the reaper, and serve in the background.
pub async fn start(config: &InkConfig, relay: Relay) -> Result<ServerHandle, std::io::Error> {
    let listener = TcpListener::bind(config.server.bind_addr()).await?;
    let addr = listener.local_addr()?;

    let reaper = match config.sessions.unattached_ttl_secs {
        0 => None,
        ttl => {
            let policy: Arc<dyn EvictionPolicy> =
                Arc::new(UnattachedTtl::new(Duration::from_secs(ttl)));
            let interval = Duration::from_secs(config.sessions.reap_interval_secs.max(1));
            Some(spawn_reaper(relay.clone(), policy, interval))
        }
    };

    let state = AppState {
        relay: relay.clone(),
        public_scheme: Arc::from(config.server.public_scheme.as_str()),
    };
    let router = build_router(state, config.server.max_payload_bytes as usize);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
        if let Err(e) = result {
            tracing::error!(error = %e, "Server error");
        }
    });

    tracing::info!(%addr, "ink-relay listening");

    Ok(ServerHandle {
        addr,
        relay,
        shutdown: Some(shutdown_tx),
        server,
        reaper,
    })
}

/// Handle returned by [`start`]; keeps background tasks reachable.
pub struct ServerHandle {
    pub addr: SocketAddr,
    relay: Relay,
    shutdown: Option<oneshot::Sender<()>>,
    server: JoinHandle<()>,
    reaper: Option<JoinHandle<()>>,
}

impl ServerHandle {
    /// Close every session, stop accepting, and wait for the server task.
    pub async fn shutdown(mut self) {
        if let Some(reaper) = self.reaper.take() {
            reaper.abort();
        }
        let closed = self.relay.close_all().await;
        tracing::info!(sessions = closed, "Shutting down");

        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = self.server.await;
    }
}
