//! Route-Definitionen der Gateway-API

use axum::routing::{get, post};
use axum::Router;

use muipgate_observability::health_router;

use crate::konsole;
use crate::rest::{handlers, GatewayState};

/// Erstellt den vollstaendigen Gateway-Router
pub fn api_router() -> Router<GatewayState> {
    Router::new()
        // Befehls- und Abfrage-API
        .route("/api/submit", post(handlers::post_submit))
        .route("/api/player", post(handlers::post_player))
        .route("/api/status", get(handlers::get_status))
        // Frontend-Hilfsendpunkte
        .route("/get", get(handlers::get_ping))
        .route("/watermark", get(handlers::get_wasserzeichen))
        // WebSocket-Konsole
        .route("/ws", get(konsole::ws_handler))
        // Health
        .merge(health_router())
}
