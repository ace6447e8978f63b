//! Liveness endpoint served next to the polling loop.

use {
    axum::{Json, Router, routing::get},
    serde_json::{Value, json},
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
};

/// Serve `/` and `/health` until cancelled. Bind or serve failures are logged
/// and the bot keeps running without the endpoint.
pub async fn serve(bind: String, cancel: CancellationToken) {
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health));

    let listener = match tokio::net::TcpListener::bind(&bind).await {
        Ok(listener) => listener,
        Err(e) => {
            warn!(addr = %bind, error = %e, "health endpoint unavailable");
            return;
        },
    };
    info!(addr = %bind, "health endpoint listening");

    let shutdown = async move { cancel.cancelled().await };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        warn!(error = %e, "health endpoint stopped with error");
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "membot",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
