//! HTTP surface: purchase endpoint, health and metrics

use crate::buy_engine::BuyEngine;
use crate::metrics::metrics;
use crate::observability::{CorrelationId, CORRELATION_HEADER};
use crate::tx_builder::{ErrorKind, TransactionBuilderError};
use crate::types::{BuyRequest, ErrorResponse, HealthResponse};
use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<BuyEngine>,
    pub metrics_enabled: bool,
}

impl AppState {
    pub fn new(engine: BuyEngine, metrics_enabled: bool) -> Self {
        Self {
            engine: Arc::new(engine),
            metrics_enabled,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/protocol/buy", post(buy))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_text))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves
pub async fn run_server(
    addr: &str,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr, "HTTP server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;
    Ok(())
}

/// HTTP status for an assembler error
pub fn status_for(err: &TransactionBuilderError) -> StatusCode {
    if let TransactionBuilderError::AnchorTimeout { .. } = err {
        return StatusCode::GATEWAY_TIMEOUT;
    }
    match err.kind() {
        ErrorKind::ClientInput => StatusCode::BAD_REQUEST,
        ErrorKind::Retryable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Configuration | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn buy(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<BuyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = CorrelationId::from_header(
        headers
            .get(CORRELATION_HEADER)
            .and_then(|value| value.to_str().ok()),
    );
    let correlation_header = [(CORRELATION_HEADER, correlation_id.to_string())];

    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let m = metrics();
            m.buy_requests_total.inc();
            m.record_failure("validation");
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Malformed purchase request body"
            );
            let body = ErrorResponse::new(
                ErrorKind::ClientInput.as_str(),
                "INVALID_BODY",
                rejection.body_text(),
            );
            return (StatusCode::BAD_REQUEST, correlation_header, Json(body)).into_response();
        }
    };

    match state.engine.handle(&request, correlation_id).await {
        Ok(response) => (StatusCode::OK, correlation_header, Json(response)).into_response(),
        Err(err) => (
            status_for(&err),
            correlation_header,
            Json(ErrorResponse::from(&err)),
        )
            .into_response(),
    }
}

/// Health check endpoint - basic liveness
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        fee_payer: state.engine.fee_payer().to_string(),
    })
}

async fn metrics_text(State(state): State<AppState>) -> Response {
    if !state.metrics_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }
    match metrics().encode_text() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&TransactionBuilderError::invalid_input("uri", "empty")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&TransactionBuilderError::derivation("object", "seed too long")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&TransactionBuilderError::anchor_unavailable("node down")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&TransactionBuilderError::AnchorTimeout { timeout_ms: 5000 }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&TransactionBuilderError::Configuration("no bump".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&TransactionBuilderError::internal("bug")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
