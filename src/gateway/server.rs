use super::{GatewayResponse, RATES_PATH, RateGateway};
use anyhow::{Context, Result};
use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use tokio::net::TcpListener;
use tracing::{info, warn};

pub fn router(gateway: RateGateway) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(RATES_PATH, get(rates_handler))
        .with_state(gateway)
}

async fn rates_handler(State(gateway): State<RateGateway>) -> impl IntoResponse {
    let response: GatewayResponse = gateway.quotes().await;
    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(response))
}

/// Serves the gateway on an already bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, gateway: RateGateway) -> Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Rate gateway listening on http://{addr}");

    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server failed")?;

    info!("Rate gateway stopped");
    Ok(())
}

pub async fn bind_and_serve(bind: &str, gateway: RateGateway) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    serve(listener, gateway).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
