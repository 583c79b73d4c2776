//! # muipgate-dispatch
//!
//! Anbindung an den entfernten Dispatch-Server:
//! - [`DispatchClient`]: zustandsloser HTTP-Wrapper um die vier
//!   MUIP-Operationen (Session, Autorisierung, Befehl, Abfragen)
//! - [`CommandPipeline`]: orchestriert den vollstaendigen Zyklus
//!   Session → Autorisierung → Verschluesselung → Ausfuehrung
//!
//! Jeder logische Befehl bekommt eine frische Session; Sessions werden
//! nie gecacht oder ueber Anfragen hinweg wiederverwendet.

pub mod client;
pub mod error;
pub mod pipeline;

// Bequeme Re-Exports
pub use client::{DispatchClient, DispatchClientKonfig};
pub use error::{DispatchError, DispatchResult};
pub use pipeline::CommandPipeline;
