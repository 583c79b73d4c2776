//! HTTP-Client fuer die vier MUIP-Operationen des Dispatch-Servers
//!
//! Jede Operation ist ein einzelner POST unter der konfigurierten
//! Basis-URL und liefert die einheitliche Huelle `{code, message, data}`.
//! Der Client haelt keinerlei Session-Zustand; das macht die Pipeline.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use muipgate_core::{
    AutorisierteSession, BefehlAntwort, BefehlDaten, BefehlErgebnis, DispatchAntwort,
    SchluesselTyp, Session,
};

use crate::error::{DispatchError, DispatchResult};

/// Konfiguration fuer den Dispatch-Client
#[derive(Debug, Clone)]
pub struct DispatchClientKonfig {
    /// Basis-URL des Dispatch-Servers (ohne `/muip`-Pfad)
    pub basis_url: String,
    /// Zeitlimit pro Aufruf; Ablauf wird als Transportfehler gemeldet
    pub timeout: Duration,
}

impl Default for DispatchClientKonfig {
    fn default() -> Self {
        Self {
            basis_url: "http://127.0.0.1:443".into(),
            timeout: Duration::from_secs(10),
        }
    }
}

// Anfragekoerper; Feldnamen sind vom MUIP-Protokoll vorgegeben.

#[derive(Serialize)]
struct SessionAnfrage {
    key_type: SchluesselTyp,
}

#[derive(Serialize)]
struct AuthAnfrage<'a> {
    session_id: &'a str,
    admin_key: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExecAnfrage<'a> {
    session_id: &'a str,
    command: &'a str,
    target_uid: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct StatusAnfrage<'a> {
    session_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SpielerAnfrage<'a> {
    session_id: &'a str,
    uid: &'a str,
}

/// Zustandsloser HTTP-Wrapper um den Dispatch-Server
pub struct DispatchClient {
    http: reqwest::Client,
    basis_url: String,
}

impl DispatchClient {
    /// Erstellt einen Client mit explizitem Timeout pro Aufruf
    pub fn neu(konfig: &DispatchClientKonfig) -> DispatchResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(konfig.timeout)
            .build()?;
        Ok(Self {
            http,
            basis_url: konfig.basis_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST an einen MUIP-Pfad, Huelle dekodieren
    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        pfad: &str,
        koerper: &B,
    ) -> DispatchResult<DispatchAntwort<T>> {
        let url = format!("{}{}", self.basis_url, pfad);
        let antwort = self.http.post(&url).json(koerper).send().await?;
        tracing::debug!(pfad, status = %antwort.status(), "Dispatch-Antwort empfangen");
        let antwort = antwort.error_for_status()?;
        Ok(antwort.json::<DispatchAntwort<T>>().await?)
    }

    /// Huelle auspacken: Code pruefen, Nutzdaten verlangen
    fn auspacken<T>(
        antwort: DispatchAntwort<T>,
        operation: &'static str,
    ) -> DispatchResult<T> {
        if !antwort.ist_erfolg() {
            return Err(DispatchError::Abgelehnt {
                code: antwort.code,
                nachricht: antwort.message,
            });
        }
        antwort.data.ok_or(DispatchError::FehlendeDaten(operation))
    }

    /// Erstellt eine frische Session (POST `/muip/create_session`)
    pub async fn session_erstellen(&self, typ: SchluesselTyp) -> DispatchResult<Session> {
        let antwort = self
            .post("/muip/create_session", &SessionAnfrage { key_type: typ })
            .await?;
        Self::auspacken(antwort, "create_session")
    }

    /// Autorisiert eine Session mit dem verschluesselten Admin-Schluessel
    /// (POST `/muip/auth_admin`). Die zurueckgegebene Kennung kann von der
    /// urspruenglichen abweichen.
    pub async fn autorisieren(
        &self,
        session_id: &str,
        admin_key_chiffrat: &str,
    ) -> DispatchResult<AutorisierteSession> {
        let antwort = self
            .post(
                "/muip/auth_admin",
                &AuthAnfrage {
                    session_id,
                    admin_key: admin_key_chiffrat,
                },
            )
            .await?;
        Self::auspacken(antwort, "auth_admin")
    }

    /// Fuehrt einen verschluesselten Befehl aus (POST `/muip/exec_cmd`).
    ///
    /// Ablehnungen (`code != 0`) und Transportfehler sind hier *weiche*
    /// Fehler: der Aufrufer bekommt ein [`BefehlErgebnis::Fehler`] zur
    /// Anzeige, keinen harten Fehler.
    pub async fn befehl_ausfuehren(
        &self,
        session_id: &str,
        befehl_chiffrat: &str,
        ziel_uid: &str,
    ) -> BefehlErgebnis {
        let anfrage = ExecAnfrage {
            session_id,
            command: befehl_chiffrat,
            target_uid: ziel_uid,
        };
        match self
            .post::<_, BefehlDaten>("/muip/exec_cmd", &anfrage)
            .await
        {
            Ok(antwort) if antwort.ist_erfolg() => match antwort.data {
                Some(daten) => BefehlErgebnis::Antwort(BefehlAntwort {
                    code: antwort.code,
                    message: antwort.message,
                    data: daten,
                }),
                None => BefehlErgebnis::Fehler {
                    error: "Ausfuehrung ohne Nutzdaten beantwortet".into(),
                },
            },
            Ok(antwort) => BefehlErgebnis::Fehler {
                error: format!(
                    "Ausfuehrung abgelehnt: {} (Code {})",
                    antwort.message, antwort.code
                ),
            },
            Err(e) => BefehlErgebnis::Fehler {
                error: format!("Ausfuehrung fehlgeschlagen: {e}"),
            },
        }
    }

    /// Fragt den Serverstatus ab (POST `/muip/server_information`)
    pub async fn server_status(
        &self,
        session_id: &str,
    ) -> DispatchResult<DispatchAntwort<serde_json::Value>> {
        let antwort: DispatchAntwort<serde_json::Value> = self
            .post("/muip/server_information", &StatusAnfrage { session_id })
            .await?;
        if !antwort.ist_erfolg() {
            return Err(DispatchError::Abgelehnt {
                code: antwort.code,
                nachricht: antwort.message,
            });
        }
        Ok(antwort)
    }

    /// Fragt Spielerinformationen ab (POST `/muip/player_information`)
    pub async fn spieler_info(
        &self,
        session_id: &str,
        uid: &str,
    ) -> DispatchResult<DispatchAntwort<serde_json::Value>> {
        let antwort: DispatchAntwort<serde_json::Value> = self
            .post(
                "/muip/player_information",
                &SpielerAnfrage { session_id, uid },
            )
            .await?;
        if !antwort.ist_erfolg() {
            return Err(DispatchError::Abgelehnt {
                code: antwort.code,
                nachricht: antwort.message,
            });
        }
        Ok(antwort)
    }
}

impl std::fmt::Debug for DispatchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DispatchClient {{ basis_url: {} }}", self.basis_url)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(basis_url: &str) -> DispatchClient {
        DispatchClient::neu(&DispatchClientKonfig {
            basis_url: basis_url.into(),
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    #[test]
    fn basis_url_ohne_schlusstrich() {
        let client = test_client("http://localhost:1234/");
        assert_eq!(client.basis_url, "http://localhost:1234");
    }

    #[tokio::test]
    async fn session_erstellen_erfolg() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/muip/create_session")
            .match_body(mockito::Matcher::Json(serde_json::json!({"key_type": "PEM"})))
            .with_status(200)
            .with_body(
                r#"{"code":0,"message":"OK","data":{"sessionId":"sitzung-1","rsaPublicKey":"-----BEGIN PUBLIC KEY-----"}}"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let session = client.session_erstellen(SchluesselTyp::Pem).await.unwrap();
        assert_eq!(session.session_id, "sitzung-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn session_erstellen_ablehnung() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/muip/create_session")
            .with_status(200)
            .with_body(r#"{"code":-1,"message":"Dienst nicht bereit"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        match client.session_erstellen(SchluesselTyp::Pem).await {
            Err(DispatchError::Abgelehnt { code, nachricht }) => {
                assert_eq!(code, -1);
                assert_eq!(nachricht, "Dienst nicht bereit");
            }
            anderes => panic!("Abgelehnt erwartet, erhalten: {anderes:?}"),
        }
    }

    #[tokio::test]
    async fn autorisieren_liefert_rotierte_kennung() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/muip/auth_admin")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "session_id": "sitzung-1",
                "admin_key": "Q2hpZmZyYXQ="
            })))
            .with_status(200)
            .with_body(r#"{"code":0,"message":"OK","data":{"sessionId":"sitzung-2"}}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let auth = client
            .autorisieren("sitzung-1", "Q2hpZmZyYXQ=")
            .await
            .unwrap();
        assert_eq!(auth.session_id, "sitzung-2");
    }

    #[tokio::test]
    async fn befehl_ablehnung_ist_weicher_fehler() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/muip/exec_cmd")
            .with_status(200)
            .with_body(r#"{"code":2,"message":"Unbekannter Befehl"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let ergebnis = client.befehl_ausfuehren("s", "chiffrat", "42").await;
        match ergebnis {
            BefehlErgebnis::Fehler { error } => {
                assert!(error.contains("Unbekannter Befehl"));
                assert!(error.contains("Code 2"));
            }
            anderes => panic!("weicher Fehler erwartet, erhalten: {anderes:?}"),
        }
    }

    #[tokio::test]
    async fn befehl_transportfehler_ist_weicher_fehler() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/muip/exec_cmd")
            .with_status(500)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let ergebnis = client.befehl_ausfuehren("s", "chiffrat", "42").await;
        assert!(ergebnis.ist_fehler());
    }

    #[tokio::test]
    async fn exec_anfrage_nutzt_pascal_case() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/muip/exec_cmd")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "SessionId": "s",
                "Command": "chiffrat",
                "TargetUid": "42"
            })))
            .with_status(200)
            .with_body(r#"{"code":0,"message":"OK","data":{"message":"SGFsbG8="}}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let ergebnis = client.befehl_ausfuehren("s", "chiffrat", "42").await;
        assert!(!ergebnis.ist_fehler());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_status_ablehnung_ist_harter_fehler() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/muip/server_information")
            .with_status(200)
            .with_body(r#"{"code":1,"message":"Nicht autorisiert"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        assert!(matches!(
            client.server_status("s").await,
            Err(DispatchError::Abgelehnt { code: 1, .. })
        ));
    }
}
