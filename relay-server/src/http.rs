//! Relay HTTP surface
//!
//! Axum server that receives row-insert notifications for the `messages`
//! table and forwards assistant-authored rows to the external endpoint.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a pure
//! inner function. The inner functions are directly testable without axum
//! dispatch machinery.
//!
//! Endpoints:
//! - ANY  /         relay handler (also mounted as the router fallback)
//! - GET  /health   health check with endpoint configuration status
//! - GET  /version  server version info
//!
//! Other methods on `/health` and `/version` fall through to the relay
//! handler. The request body size is not capped.

use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use relay_core::{Forwarder, HttpForwarder, InboundNotification, RelayConfig, RelayError, RelayRequest};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::Instrument;

/// Shared state for all HTTP handlers. Immutable for the life of the server.
#[derive(Clone)]
pub struct RelayState {
    pub config: RelayConfig,
    pub forwarder: Arc<dyn Forwarder>,
}

impl RelayState {
    /// State backed by the reqwest forwarder.
    pub fn from_config(config: RelayConfig) -> std::result::Result<Self, RelayError> {
        let forwarder = HttpForwarder::new(&config.relay)?;
        Ok(Self {
            config,
            forwarder: Arc::new(forwarder),
        })
    }
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/", any(relay_handler))
        .route("/health", get(health_handler).fallback(relay_handler))
        .route("/version", get(version_handler).fallback(relay_handler))
        .fallback(relay_handler)
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    config: RelayConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let state = Arc::new(RelayState::from_config(config)?);

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Relay listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

/// What the relay did with a well-formed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Role was not `assistant`; no outbound call was made.
    Skipped,
    /// External endpoint answered 2xx with this body text.
    Forwarded { gcf_result: String },
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner relay: parse, filter, forward. Makes at most one outbound call.
pub async fn relay_inner(state: &RelayState, body: &[u8]) -> std::result::Result<RelayOutcome, RelayError> {
    let notification = InboundNotification::parse(body)?;
    let record = &notification.record;

    tracing::info!(
        id = %record.id,
        conversation_id = %record.conversation_id,
        role = %record.role,
        table = notification.table.as_deref().unwrap_or("-"),
        "Received message notification"
    );

    if !record.is_assistant() {
        tracing::info!("Not an assistant message, skipping external call");
        return Ok(RelayOutcome::Skipped);
    }

    let Some(endpoint) = state.config.relay.endpoint() else {
        tracing::error!(
            "{} is not set and relay.endpoint_url is empty",
            relay_core::ENDPOINT_ENV_VAR
        );
        return Err(RelayError::MissingEndpoint);
    };

    let request = RelayRequest::from_record(record);
    let gcf_result = state.forwarder.forward(endpoint, &request).await?;

    Ok(RelayOutcome::Forwarded { gcf_result })
}

/// Map a relay result to the status and JSON body returned to the caller.
pub fn outcome_to_http(
    result: &std::result::Result<RelayOutcome, RelayError>,
) -> (StatusCode, serde_json::Value) {
    match result {
        Ok(RelayOutcome::Skipped) => (
            StatusCode::OK,
            json!({ "message": "Not an assistant message" }),
        ),
        Ok(RelayOutcome::Forwarded { gcf_result }) => (
            StatusCode::OK,
            json!({ "message": "GCF called successfully", "gcfResult": gcf_result }),
        ),
        Err(e) => (e.status_code(), json!({ "error": e.client_message() })),
    }
}

/// Inner health check: reports whether an endpoint is configured.
pub fn health_inner(config: &RelayConfig) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::OK,
        json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoint_configured": config.relay.endpoint().is_some(),
        }),
    )
}

/// Inner version: returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    json!({
        "version": env!("CARGO_PKG_VERSION"),
        "service": "relay",
    })
}

// ============================================================================
// Axum handler wrappers (thin, delegate to inner functions)
// ============================================================================

/// Accepts any method; the body is parsed regardless of Content-Type.
pub async fn relay_handler(State(state): State<Arc<RelayState>>, body: Bytes) -> Response {
    let span = tracing::info_span!("relay", invocation_id = %uuid::Uuid::new_v4());

    let result = relay_inner(&state, &body).instrument(span.clone()).await;
    if let Err(e) = &result {
        span.in_scope(|| tracing::error!(error = %e, "Error in relay handler"));
    }

    let (status, json_body) = outcome_to_http(&result);
    match result {
        Ok(RelayOutcome::Forwarded { .. }) => (
            status,
            [(header::CONNECTION, "keep-alive")],
            Json(json_body),
        )
            .into_response(),
        _ => (status, Json(json_body)).into_response(),
    }
}

pub async fn health_handler(State(state): State<Arc<RelayState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.config);
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

// ============================================================================
// Unit Tests: call inner functions directly
// ============================================================================
