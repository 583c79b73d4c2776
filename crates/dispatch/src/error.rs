//! Fehlertypen fuer die Dispatch-Anbindung

use muipgate_crypto::CryptoError;
use thiserror::Error;

/// Fehler beim Sprechen mit dem Dispatch-Server
///
/// Weiche Ausfuehrungsfehler (Befehl zugestellt, aber abgelehnt) tauchen
/// hier bewusst nicht auf; sie fliessen als [`BefehlErgebnis::Fehler`]
/// zurueck an den Aufrufer.
///
/// [`BefehlErgebnis::Fehler`]: muipgate_core::BefehlErgebnis
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Dispatch-Server hat abgelehnt: {nachricht} (Code {code})")]
    Abgelehnt { code: i32, nachricht: String },

    #[error("Transportfehler: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Antwort ohne Nutzdaten bei {0}")]
    FehlendeDaten(&'static str),

    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Krypto(#[from] CryptoError),

    #[error("Nachricht nicht dekodierbar: {0}")]
    Dekodierung(#[from] base64::DecodeError),

    #[error("Dekodierte Nachricht ist kein UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

impl DispatchError {
    /// `true` wenn der Fehler vom Transport (Netzwerk/HTTP) stammt
    pub fn ist_transportfehler(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
