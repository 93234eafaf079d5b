//! HTTP server wiring.

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::handlers::{
    create_transaction, healthz, list_transactions, mark_reviewed, metrics, ApiState,
};

/// Build the application router over shared state.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/transaction", post(create_transaction))
        .route("/transaction/:txid/reviewed", post(mark_reviewed))
        .route("/transactions", post(list_transactions))
        .route("/status/healthz", get(healthz))
        .route("/status/metrics", get(metrics))
        .with_state(state)
}

/// The HTTP server, configured with a port and shared state.
pub struct ApiServer {
    pub port: u16,
    pub state: Arc<ApiState>,
}

impl ApiServer {
    pub fn new(port: u16, state: Arc<ApiState>) -> Self {
        Self { port, state }
    }

    /// Serve until the given future resolves, then drain in-flight requests.
    pub async fn start<F>(&self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.state.clone());

        let addr = format!("0.0.0.0:{}", self.port);
        info!("API server listening on {}", addr);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("API server shutting down");
            })
            .await
    }
}
