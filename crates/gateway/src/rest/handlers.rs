//! REST-Handler der Gateway-API
//!
//! Validierung (fehlende UID / fehlender Befehl) und das Rate-Gate laufen
//! hier, bevor die Pipeline ueberhaupt angestossen wird. Weiche
//! Ausfuehrungsfehler der Pipeline gehen als Status 500 mit dem Ergebnis
//! als Koerper zurueck, damit das Frontend die Meldung anzeigen kann.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;

use muipgate_core::{BefehlErgebnis, SchluesselTyp};

use crate::error::GatewayError;
use crate::rest::{fehler_antwort, GatewayState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    pub key_type: Option<SchluesselTyp>,
    pub uid: Option<String>,
    pub command: Option<String>,
}

/// POST /api/submit - Befehl gegen den Dispatch-Server ausfuehren
pub async fn post_submit(
    State(state): State<GatewayState>,
    Json(body): Json<SubmitBody>,
) -> Response {
    let (uid, befehl) = match (body.uid.as_deref(), body.command.as_deref()) {
        (Some(uid), Some(befehl)) if !uid.is_empty() && !befehl.is_empty() => (uid, befehl),
        _ => {
            tracing::error!("Submit ohne UID oder Befehl abgewiesen");
            return fehler_antwort(&GatewayError::UngueltigeEingabe(
                "UID und Befehl sind erforderlich".into(),
            ));
        }
    };

    if let crate::rate_limit::GateEntscheid::Abgelehnt { retry_after } =
        state.rate_gate.pruefen(uid)
    {
        return fehler_antwort(&GatewayError::RateLimitUeberschritten {
            retry_after_secs: retry_after.as_secs(),
        });
    }

    tracing::info!(uid, befehl, "Submit-Anfrage wird verarbeitet");

    match state
        .pipeline
        .befehl_ausfuehren(body.key_type, uid, befehl)
        .await
    {
        Ok(ergebnis @ BefehlErgebnis::Fehler { .. }) => {
            // Weicher Fehler: Ergebnis unveraendert durchreichen
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ergebnis)).into_response()
        }
        Ok(ergebnis) => (StatusCode::OK, Json(ergebnis)).into_response(),
        Err(e) => {
            tracing::error!(fehler = %e, "Submit fehlgeschlagen");
            fehler_antwort(&GatewayError::from(e))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayerBody {
    pub uid: Option<String>,
}

/// POST /api/player - Spielerinformationen abfragen
pub async fn post_player(
    State(state): State<GatewayState>,
    Json(body): Json<PlayerBody>,
) -> Response {
    let uid = match body.uid.as_deref() {
        Some(uid) if !uid.is_empty() => uid,
        _ => {
            tracing::error!("Spieler-Abfrage ohne UID abgewiesen");
            return fehler_antwort(&GatewayError::UngueltigeEingabe(
                "UID ist erforderlich".into(),
            ));
        }
    };

    tracing::info!(uid, "Spieler-Abfrage wird verarbeitet");
    match state.pipeline.spieler_abfragen(uid).await {
        Ok(antwort) => (StatusCode::OK, Json(antwort)).into_response(),
        Err(e) => {
            tracing::error!(fehler = %e, "Spieler-Abfrage fehlgeschlagen");
            fehler_antwort(&GatewayError::from(e))
        }
    }
}

/// GET /api/status - Serverstatus abfragen
pub async fn get_status(State(state): State<GatewayState>) -> Response {
    tracing::info!("Status-Abfrage wird verarbeitet");
    match state.pipeline.status_abfragen().await {
        Ok(antwort) => (StatusCode::OK, Json(antwort)).into_response(),
        Err(e) => {
            tracing::error!(fehler = %e, "Status-Abfrage fehlgeschlagen");
            fehler_antwort(&GatewayError::from(e))
        }
    }
}

/// GET /get - Erreichbarkeits-Probe fuer das Frontend
pub async fn get_ping() -> impl IntoResponse {
    Json(json!({ "success": true }))
}

/// GET /watermark - statische Projektkennung fuer das Frontend
pub async fn get_wasserzeichen() -> impl IntoResponse {
    Json(json!({
        "message1": "MuipGate ist ein freies, unabhaengiges Projekt",
        "message2": "Es wird in keiner Form Geld verlangt",
        "message3": "MuipGate Dispatch-Relay",
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use rsa::pkcs8::{EncodePublicKey, LineEnding};
    use rsa::RsaPrivateKey;
    use tower::ServiceExt;

    use muipgate_core::SchluesselTyp;
    use muipgate_dispatch::{CommandPipeline, DispatchClient, DispatchClientKonfig};

    use crate::rate_limit::{RateGate, RateGateKonfig};
    use crate::rest::{routes::api_router, GatewayState};

    fn test_state(basis_url: &str) -> GatewayState {
        let client = DispatchClient::neu(&DispatchClientKonfig {
            basis_url: basis_url.into(),
            timeout: Duration::from_secs(2),
        })
        .unwrap();
        GatewayState::neu(
            Arc::new(CommandPipeline::neu(client, "geheim", SchluesselTyp::Pem)),
            RateGate::neu(RateGateKonfig::default()),
            None,
        )
    }

    fn submit_anfrage(koerper: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/submit")
            .header("content-type", "application/json")
            .body(Body::from(koerper.to_string()))
            .unwrap()
    }

    async fn json_koerper(antwort: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(antwort.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn submit_ohne_uid_liefert_400() {
        let app = api_router().with_state(test_state("http://127.0.0.1:1"));
        let antwort = app
            .oneshot(submit_anfrage(serde_json::json!({ "command": "kick" })))
            .await
            .unwrap();
        assert_eq!(antwort.status(), StatusCode::BAD_REQUEST);
        let json = json_koerper(antwort).await;
        assert!(json["error"].as_str().unwrap().contains("UID"));
    }

    #[tokio::test]
    async fn dritter_submit_in_folge_liefert_429() {
        // Dispatch-Server der jeden Zyklus ablehnt; fuer den Test reicht
        // das, es geht nur um das Rate-Gate davor.
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/muip/create_session")
            .with_status(200)
            .with_body(r#"{"code":-1,"message":"zu"}"#)
            .expect(2)
            .create_async()
            .await;

        let app = api_router().with_state(test_state(&server.url()));
        let koerper = serde_json::json!({ "uid": "u1", "command": "kick" });

        for _ in 0..2 {
            let antwort = app
                .clone()
                .oneshot(submit_anfrage(koerper.clone()))
                .await
                .unwrap();
            assert_ne!(antwort.status(), StatusCode::TOO_MANY_REQUESTS);
        }

        let antwort = app.oneshot(submit_anfrage(koerper)).await.unwrap();
        assert_eq!(antwort.status(), StatusCode::TOO_MANY_REQUESTS);
        let json = json_koerper(antwort).await;
        assert_eq!(json["retry_after_secs"], 30);
    }

    #[tokio::test]
    async fn submit_voller_zyklus_liefert_dekodierte_nachricht() {
        let mut rng = rand::thread_rng();
        let privat = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let pem = privat
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap();

        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/muip/create_session")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "code": 0, "message": "OK",
                    "data": { "sessionId": "s1", "rsaPublicKey": pem }
                })
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("POST", "/muip/auth_admin")
            .with_status(200)
            .with_body(r#"{"code":0,"message":"OK","data":{"sessionId":"s2"}}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/muip/exec_cmd")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "code": 0, "message": "OK",
                    "data": { "message": BASE64.encode("Gegenstand vergeben") }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let app = api_router().with_state(test_state(&server.url()));
        let antwort = app
            .oneshot(submit_anfrage(
                serde_json::json!({ "uid": "42", "command": "give 1001" }),
            ))
            .await
            .unwrap();

        assert_eq!(antwort.status(), StatusCode::OK);
        let json = json_koerper(antwort).await;
        assert_eq!(json["data"]["message"], "Gegenstand vergeben");
    }

    #[tokio::test]
    async fn player_ohne_uid_liefert_400() {
        let app = api_router().with_state(test_state("http://127.0.0.1:1"));
        let antwort = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/player")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(antwort.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn ping_und_wasserzeichen() {
        let app = api_router().with_state(test_state("http://127.0.0.1:1"));
        let antwort = app
            .clone()
            .oneshot(Request::builder().uri("/get").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(antwort.status(), StatusCode::OK);
        assert_eq!(json_koerper(antwort).await["success"], true);

        let antwort = app
            .oneshot(
                Request::builder()
                    .uri("/watermark")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(antwort.status(), StatusCode::OK);
    }
}
