//! # muipgate-crypto
//!
//! Session-Verschluesselung fuer das Dispatch-Protokoll.
//!
//! Der Dispatch-Server liefert pro Session einen oeffentlichen
//! RSA-Schluessel; Admin-Schluessel und Befehle werden damit per
//! PKCS#1 v1.5 verschluesselt und Base64-kodiert uebertragen. Das
//! Padding-Schema ist vom Protokoll vorgegeben und darf nicht
//! geaendert werden (Wire-Kompatibilitaet).
//!
//! ## Module
//! - `cipher` - [`SessionCipher`]: PEM-Parsing und Verschluesselung
//! - `error` - Fehlertypen

pub mod cipher;
pub mod error;

// Bequeme Re-Exports
pub use cipher::{SessionCipher, PKCS1_PADDING_BYTES};
pub use error::{CryptoError, CryptoResult};
