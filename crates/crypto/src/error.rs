//! Fehlertypen fuer das Kryptografie-Subsystem

use thiserror::Error;

/// Fehler beim Umgang mit Session-Schluesseln
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Ungueltiger oeffentlicher Schluessel: {0}")]
    UngueltigerSchluessel(String),

    #[error("Klartext zu lang: {laenge} Bytes, maximal {maximal} Bytes bei PKCS#1 v1.5")]
    KlartextZuLang { laenge: usize, maximal: usize },

    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
