//! REST-Interface des MuipGate Gateways

pub mod handlers;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use muipgate_dispatch::CommandPipeline;
use muipgate_observability::LogSpiegel;

use crate::error::GatewayError;
use crate::rate_limit::RateGate;

/// Axum-State des Gateways
///
/// Clone teilt die inneren Arcs; der Log-Spiegel fehlt wenn die
/// WebSocket-Konsole deaktiviert ist.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<CommandPipeline>,
    pub rate_gate: Arc<RateGate>,
    pub log_spiegel: Option<LogSpiegel>,
}

impl GatewayState {
    pub fn neu(
        pipeline: Arc<CommandPipeline>,
        rate_gate: Arc<RateGate>,
        log_spiegel: Option<LogSpiegel>,
    ) -> Self {
        Self {
            pipeline,
            rate_gate,
            log_spiegel,
        }
    }
}

/// Einheitliche JSON-Fehlerantwort
pub fn fehler_antwort(fehler: &GatewayError) -> Response {
    let status = StatusCode::from_u16(fehler.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let koerper = match fehler {
        GatewayError::RateLimitUeberschritten { retry_after_secs } => json!({
            "error": fehler.to_string(),
            "retry_after_secs": retry_after_secs,
        }),
        _ => json!({ "error": fehler.to_string() }),
    };
    (status, Json(koerper)).into_response()
}

pub use server::{RestServer, RestServerKonfig};
