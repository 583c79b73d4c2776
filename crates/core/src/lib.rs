//! # muipgate-core
//!
//! Gemeinsame Wire-Typen fuer MuipGate: die Antwort-Huelle des
//! Dispatch-Servers, Session-Typen und Befehlsergebnisse.
//!
//! Alle Typen sind transient und an genau einen Anfragezyklus gebunden;
//! persistiert wird hier nichts.

pub mod types;

// Bequeme Re-Exports
pub use types::{
    AutorisierteSession, BefehlAntwort, BefehlDaten, BefehlErgebnis, DispatchAntwort,
    SchluesselTyp, Session,
};
