//! Admin-Konsole ueber stdin und WebSocket
//!
//! Beide Zugaenge sprechen dasselbe Eingabeformat
//! `command:'<befehl>' uid:'<uid>'` und laufen auf die gemeinsame
//! Befehls-Pipeline. Verbundene WebSocket-Clients bekommen zusaetzlich
//! die Log-Zeilen des [`LogSpiegel`]s gespiegelt; Ergebnisse werden ueber
//! tracing gemeldet und erreichen die Clients auf demselben Weg.
//!
//! [`LogSpiegel`]: muipgate_observability::LogSpiegel

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use muipgate_core::BefehlErgebnis;

use crate::rest::GatewayState;

/// Geparster Konsolen-Befehl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KonsolenBefehl {
    pub befehl: String,
    pub uid: String,
}

/// Liest den Wert hinter `schluessel` bis zum naechsten `'`
fn segment_lesen(zeile: &str, schluessel: &str) -> Option<String> {
    let start = zeile.find(schluessel)? + schluessel.len();
    let rest = &zeile[start..];
    let ende = rest.find('\'')?;
    Some(rest[..ende].to_string())
}

/// Parst eine Konsolen-Zeile im Format `command:'<befehl>' uid:'<uid>'`
pub fn eingabe_parsen(zeile: &str) -> Option<KonsolenBefehl> {
    let befehl = segment_lesen(zeile, "command:'")?;
    let uid = segment_lesen(zeile, "uid:'")?;
    if befehl.is_empty() || uid.is_empty() {
        return None;
    }
    Some(KonsolenBefehl { befehl, uid })
}

/// Fuehrt einen Konsolen-Befehl aus und meldet das Ergebnis ueber tracing
pub(crate) async fn befehl_verarbeiten(state: &GatewayState, eingabe: KonsolenBefehl) {
    tracing::info!(uid = %eingabe.uid, befehl = %eingabe.befehl, "Konsolen-Befehl wird verarbeitet");
    match state
        .pipeline
        .befehl_ausfuehren(None, &eingabe.uid, &eingabe.befehl)
        .await
    {
        Ok(BefehlErgebnis::Antwort(antwort)) => {
            tracing::info!(nachricht = %antwort.data.message, "Konsolen-Befehl ausgefuehrt");
        }
        Ok(BefehlErgebnis::Fehler { error }) => {
            tracing::error!(fehler = %error, "Konsolen-Befehl abgelehnt");
        }
        Err(e) => {
            tracing::error!(fehler = %e, "Konsolen-Befehl fehlgeschlagen");
        }
    }
}

/// GET /ws - Konsolen-WebSocket
pub async fn ws_handler(State(state): State<GatewayState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| verbindung_behandeln(socket, state))
}

/// Behandelt eine einzelne WebSocket-Verbindung
async fn verbindung_behandeln(socket: WebSocket, state: GatewayState) {
    tracing::info!("Konsolen-Client verbunden");
    let (mut sender, mut empfaenger) = socket.split();

    // Log-Zeilen an den Client weiterleiten, solange die Verbindung lebt
    let weiterleitung = state.log_spiegel.as_ref().map(|spiegel| {
        let mut log_rx = spiegel.abonnieren();
        tokio::spawn(async move {
            loop {
                match log_rx.recv().await {
                    Ok(zeile) => {
                        if sender.send(Message::Text(zeile)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(verpasst)) => {
                        tracing::debug!(verpasst, "Konsolen-Client hinkt hinterher");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    });

    // Eingehende Nachrichten als Konsolen-Eingabe behandeln
    while let Some(Ok(nachricht)) = empfaenger.next().await {
        if let Message::Text(text) = nachricht {
            match eingabe_parsen(&text) {
                Some(eingabe) => befehl_verarbeiten(&state, eingabe).await,
                None => tracing::error!(
                    "Ungueltige Konsolen-Eingabe. Format: command:'<befehl>' uid:'<uid>'"
                ),
            }
        }
    }

    if let Some(task) = weiterleitung {
        task.abort();
    }
    tracing::info!("Konsolen-Client getrennt");
}

/// Startet die stdin-Konsole als Hintergrund-Task
pub fn stdin_konsole_starten(state: GatewayState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut zeilen = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match zeilen.next_line().await {
                Ok(Some(zeile)) => {
                    if zeile.trim().is_empty() {
                        continue;
                    }
                    match eingabe_parsen(&zeile) {
                        Some(eingabe) => befehl_verarbeiten(&state, eingabe).await,
                        None => tracing::error!(
                            "Ungueltige Eingabe. Format: command:'<befehl>' uid:'<uid>'"
                        ),
                    }
                }
                Ok(None) => break, // stdin geschlossen
                Err(e) => {
                    tracing::warn!(fehler = %e, "stdin nicht lesbar, Konsole beendet");
                    break;
                }
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
