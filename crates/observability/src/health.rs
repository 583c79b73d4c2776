//! Health-Check-Endpunkt
//!
//! Meldet nur die Lebendigkeit des Gateways selbst; die Erreichbarkeit
//! des Dispatch-Servers wird bewusst nicht geprueft (jeder Befehl baut
//! ohnehin eine frische Verbindung auf).

use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde_json::json;

/// GET /health - Health-Check
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Router mit dem Health-Endpunkt; generisch ueber den App-State
pub fn health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_antwortet_ok() {
        let app: Router = health_router();
        let antwort = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(antwort.status(), StatusCode::OK);
        let koerper = to_bytes(antwort.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&koerper).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
