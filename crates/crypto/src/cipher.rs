//! Session-Cipher: RSA PKCS#1 v1.5 mit Base64-Ausgabe
//!
//! Kapselt den oeffentlichen Schluessel einer Dispatch-Session. Zustandslos
//! bis auf den geparsten Schluessel; ein Cipher gehoert zu genau einer
//! Session und wird mit ihr verworfen.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use crate::error::{CryptoError, CryptoResult};

/// PKCS#1 v1.5 reserviert 11 Bytes pro Block fuer das Padding
pub const PKCS1_PADDING_BYTES: usize = 11;

/// Oeffentlicher Session-Schluessel des Dispatch-Servers
pub struct SessionCipher {
    schluessel: RsaPublicKey,
}

impl SessionCipher {
    /// Parst einen PEM-kodierten oeffentlichen RSA-Schluessel.
    ///
    /// Akzeptiert sowohl PKCS#8 (`BEGIN PUBLIC KEY`) als auch das aeltere
    /// PKCS#1-Format (`BEGIN RSA PUBLIC KEY`); der Dispatch-Server liefert
    /// je nach Version beides.
    pub fn aus_pem(pem: &str) -> CryptoResult<Self> {
        let schluessel = match RsaPublicKey::from_public_key_pem(pem) {
            Ok(schluessel) => schluessel,
            Err(_) => RsaPublicKey::from_pkcs1_pem(pem)
                .map_err(|e| CryptoError::UngueltigerSchluessel(e.to_string()))?,
        };
        Ok(Self { schluessel })
    }

    /// Maximale Klartextlaenge in Bytes fuer diesen Schluessel
    pub fn max_klartext(&self) -> usize {
        self.schluessel.size() - PKCS1_PADDING_BYTES
    }

    /// Verschluesselt den Klartext und liefert das Chiffrat Base64-kodiert.
    ///
    /// Klartexte ueber [`max_klartext`](Self::max_klartext) werden vor dem
    /// Bibliotheksaufruf abgewiesen, damit der Fehler die Laengen nennt.
    pub fn verschluesseln(&self, klartext: &[u8]) -> CryptoResult<String> {
        let maximal = self.max_klartext();
        if klartext.len() > maximal {
            return Err(CryptoError::KlartextZuLang {
                laenge: klartext.len(),
                maximal,
            });
        }

        let mut rng = rand::thread_rng();
        let chiffrat = self
            .schluessel
            .encrypt(&mut rng, Pkcs1v15Encrypt, klartext)
            .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

        Ok(BASE64.encode(chiffrat))
    }
}

impl std::fmt::Debug for SessionCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionCipher {{ bits: {} }}", self.schluessel.size() * 8)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
