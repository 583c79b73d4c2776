//! Befehls-Pipeline: Session → Autorisierung → Verschluesselung → Ausfuehrung
//!
//! Der Zyklus ist eine lineare Zustandsmaschine mit strikter Reihenfolge
//! und ohne Wiederholungen; jede Stufe haengt vom Ergebnis der vorherigen
//! ab. Scheitert eine der harten Stufen (Session, Autorisierung,
//! Verschluesselung), bricht der gesamte Durchlauf ab. Nur die
//! Ausfuehrungsstufe selbst liefert weiche Fehler als Daten zurueck.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use muipgate_core::{AutorisierteSession, BefehlErgebnis, DispatchAntwort, SchluesselTyp};
use muipgate_crypto::SessionCipher;

use crate::client::DispatchClient;
use crate::error::DispatchResult;

/// Ergebnis der Stufen 1-3: autorisierte Session samt Session-Cipher
///
/// Der Cipher stammt aus der *urspruenglichen* Session; Befehle werden
/// damit verschluesselt, auch wenn die Autorisierung eine rotierte
/// Session-Kennung geliefert hat. Die Struktur macht diese Invariante
/// im Typsystem sichtbar.
struct AutorisierteStufe {
    cipher: SessionCipher,
    auth: AutorisierteSession,
}

/// Orchestriert den vollstaendigen Befehlszyklus gegen den Dispatch-Server
pub struct CommandPipeline {
    client: DispatchClient,
    admin_schluessel: String,
    /// Schluesselformat wenn der Aufrufer keines vorgibt
    standard_typ: SchluesselTyp,
}

impl CommandPipeline {
    pub fn neu(
        client: DispatchClient,
        admin_schluessel: impl Into<String>,
        standard_typ: SchluesselTyp,
    ) -> Self {
        Self {
            client,
            admin_schluessel: admin_schluessel.into(),
            standard_typ,
        }
    }

    /// Stufen 1-3: Session erstellen, Admin-Schluessel verschluesseln,
    /// Session autorisieren
    async fn session_autorisieren(
        &self,
        typ: SchluesselTyp,
    ) -> DispatchResult<AutorisierteStufe> {
        let session = self.client.session_erstellen(typ).await?;
        tracing::debug!(session_id = %session.session_id, "Session erstellt");

        let cipher = SessionCipher::aus_pem(&session.rsa_public_key)?;
        let admin_chiffrat = cipher.verschluesseln(self.admin_schluessel.as_bytes())?;

        let auth = self
            .client
            .autorisieren(&session.session_id, &admin_chiffrat)
            .await?;
        tracing::debug!(session_id = %auth.session_id, "Session autorisiert");

        Ok(AutorisierteStufe { cipher, auth })
    }

    /// Fuehrt einen Befehl fuer die Ziel-UID aus.
    ///
    /// Ohne explizites `typ` gilt das konfigurierte Standardformat.
    /// Weiche Fehler der Ausfuehrungsstufe werden unveraendert
    /// durchgereicht; bei Erfolg wird `data.message` von Base64 zu
    /// Klartext dekodiert.
    pub async fn befehl_ausfuehren(
        &self,
        typ: Option<SchluesselTyp>,
        ziel_uid: &str,
        befehl: &str,
    ) -> DispatchResult<BefehlErgebnis> {
        let stufe = self
            .session_autorisieren(typ.unwrap_or(self.standard_typ))
            .await?;
        let befehl_chiffrat = stufe.cipher.verschluesseln(befehl.as_bytes())?;

        let ergebnis = self
            .client
            .befehl_ausfuehren(&stufe.auth.session_id, &befehl_chiffrat, ziel_uid)
            .await;

        match ergebnis {
            BefehlErgebnis::Antwort(mut antwort) => {
                // Dekodierung nur bei fehlerfreiem Ergebnis
                let roh = BASE64.decode(antwort.data.message.as_bytes())?;
                antwort.data.message = String::from_utf8(roh)?;
                tracing::info!(uid = ziel_uid, nachricht = %antwort.data.message, "Befehl ausgefuehrt");
                Ok(BefehlErgebnis::Antwort(antwort))
            }
            fehler => {
                tracing::warn!(uid = ziel_uid, "Befehl mit weichem Fehler beantwortet");
                Ok(fehler)
            }
        }
    }

    /// Lesende Schwester-Pipeline: Serverstatus (Stufen 1-3 + Abfrage)
    pub async fn status_abfragen(
        &self,
    ) -> DispatchResult<DispatchAntwort<serde_json::Value>> {
        let stufe = self.session_autorisieren(self.standard_typ).await?;
        self.client.server_status(&stufe.auth.session_id).await
    }

    /// Lesende Schwester-Pipeline: Spielerinformationen
    pub async fn spieler_abfragen(
        &self,
        uid: &str,
    ) -> DispatchResult<DispatchAntwort<serde_json::Value>> {
        let stufe = self.session_autorisieren(self.standard_typ).await?;
        self.client.spieler_info(&stufe.auth.session_id, uid).await
    }
}

impl std::fmt::Debug for CommandPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Admin-Schluessel absichtlich nicht ausgeben
        write!(f, "CommandPipeline {{ client: {:?} }}", self.client)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
