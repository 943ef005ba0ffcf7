use crate::gauges::GaugeBoard;
use axum::{extract::State, http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// HTTP surface of the exporter: `/metrics` renders the gauge board in the
/// text exposition format, `/healthz` answers liveness probes.
pub fn router(board: Arc<GaugeBoard>) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/healthz", get(healthz))
        .with_state(board)
}

/// Bind and serve until the process exits. Collection runs in a separate
/// task; a slow or stalled cycle never blocks a scrape.
pub async fn serve(board: Arc<GaugeBoard>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(board);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving metrics on http://{}/metrics", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn metrics(State(board): State<Arc<GaugeBoard>>) -> String {
    board.encode()
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
