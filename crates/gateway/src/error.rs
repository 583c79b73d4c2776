//! Fehlertypen fuer das MuipGate Gateway

use muipgate_dispatch::DispatchError;
use thiserror::Error;

/// Alle moeglichen Fehler an der Gateway-Oberflaeche
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("Rate-Limit ueberschritten: bitte warte {retry_after_secs} Sekunden")]
    RateLimitUeberschritten { retry_after_secs: u64 },

    #[error("Dispatch-Fehler: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Interner Fehler: {0}")]
    Intern(#[from] anyhow::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// HTTP-Statuscode fuer REST-Fehlerantworten
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UngueltigeEingabe(_) => 400,
            Self::RateLimitUeberschritten { .. } => 429,
            Self::Dispatch(e) if e.ist_transportfehler() => 502,
            Self::Dispatch(_) => 500,
            Self::Intern(_) => 500,
        }
    }
}
