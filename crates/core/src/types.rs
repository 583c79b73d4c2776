//! Wire-Typen des Dispatch-Protokolls
//!
//! Der Dispatch-Server antwortet auf jede Operation mit derselben Huelle
//! `{code, message, data}`; `code == 0` bedeutet Erfolg. Die Feldnamen der
//! Nutzdaten sind vom Protokoll vorgegeben (camelCase bzw. PascalCase) und
//! werden per serde-Attribut abgebildet.

use serde::{Deserialize, Serialize};

/// Schluesselformat das der Dispatch-Server beim Session-Aufbau liefert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchluesselTyp {
    /// PEM-kodierter RSA-Schluessel (Standard)
    #[default]
    Pem,
    /// XML-kodierter RSA-Schluessel (Altformat des Dispatch-Servers)
    Xml,
}

impl std::fmt::Display for SchluesselTyp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pem => write!(f, "PEM"),
            Self::Xml => write!(f, "XML"),
        }
    }
}

/// Einheitliche Antwort-Huelle des Dispatch-Servers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct DispatchAntwort<T> {
    /// Statuscode des Dispatch-Servers; 0 = Erfolg
    pub code: i32,
    /// Menschenlesbare Statusmeldung
    #[serde(default)]
    pub message: String,
    /// Operationsspezifische Nutzdaten (fehlt bei manchen Fehlern)
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> DispatchAntwort<T> {
    /// `true` wenn der Dispatch-Server die Operation akzeptiert hat
    pub fn ist_erfolg(&self) -> bool {
        self.code == 0
    }
}

/// Frische, noch nicht autorisierte Session
///
/// Wird von `create_session` geliefert und lebt genau einen
/// Pipeline-Durchlauf lang; Sessions werden nie wiederverwendet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    /// PEM-kodierter oeffentlicher RSA-Schluessel der Session
    pub rsa_public_key: String,
}

/// Session-Kennung nach erfolgreicher Admin-Autorisierung
///
/// Der Dispatch-Server darf die Kennung beim Autorisieren rotieren; diese
/// Kennung (nicht die urspruengliche) gehoert in alle Folgeaufrufe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutorisierteSession {
    pub session_id: String,
}

/// Nutzdaten einer Befehlsantwort
///
/// `message` kommt vom Dispatch-Server Base64-kodiert und wird von der
/// Pipeline vor der Rueckgabe zu Klartext dekodiert. Weitere Felder werden
/// unveraendert durchgereicht.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BefehlDaten {
    pub message: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Vollstaendige Befehlsantwort des Dispatch-Servers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BefehlAntwort {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    pub data: BefehlDaten,
}

/// Ergebnis einer Befehlsausfuehrung, wie es an den Aufrufer geht
///
/// Abgelehnte oder am Transport gescheiterte Befehle sind ein *weicher*
/// Fehler: sie werden als Daten zurueckgegeben, nicht als Fehler geworfen,
/// damit der Aufrufer die Meldung anzeigen kann.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BefehlErgebnis {
    /// Erfolgreiche Antwort (Nachricht ggf. bereits dekodiert)
    Antwort(BefehlAntwort),
    /// Weicher Fehler: Befehl abgelehnt oder Zustellung gescheitert
    Fehler { error: String },
}

impl BefehlErgebnis {
    /// `true` wenn das Ergebnis ein weicher Fehler ist
    pub fn ist_fehler(&self) -> bool {
        matches!(self, Self::Fehler { .. })
    }
}
