use std::net::SocketAddr;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::info;

use crate::relay::{RelayResponse, SubscribeRelay, SubscribeRequest};

pub const SUBSCRIBE_PATH: &str = "/api/subscribe";

pub fn router(relay: SubscribeRelay) -> Router {
    Router::new()
        .route(SUBSCRIBE_PATH, post(subscribe))
        .with_state(relay)
}

/// Binds `addr` and serves the relay until the process is stopped.
pub async fn serve(
    addr: SocketAddr,
    relay: SubscribeRelay,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        configured = relay.is_configured(),
        "Newsletter relay listening"
    );
    axum::serve(listener, router(relay)).await
}

async fn subscribe(
    State(relay): State<SubscribeRelay>,
    Json(payload): Json<Value>,
) -> RelayResponse {
    relay.handle(&SubscribeRequest::from_value(&payload)).await
}
