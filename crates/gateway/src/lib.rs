//! # muipgate-gateway
//!
//! Der nach aussen sichtbare Teil von MuipGate:
//! - **REST** (`/api/...`): Axum HTTP-Server mit JSON-API
//! - **Rate-Gate**: gleitendes Fenster pro Ziel-UID mit Sperrstrafe
//! - **Konsole**: stdin- und WebSocket-Konsole mit Log-Spiegel
//!
//! Alle Zugaenge laufen auf dieselbe [`CommandPipeline`].
//!
//! [`CommandPipeline`]: muipgate_dispatch::CommandPipeline

pub mod error;
pub mod konsole;
pub mod rate_limit;
pub mod rest;

pub use error::{GatewayError, GatewayResult};
pub use rate_limit::{GateEntscheid, RateGate, RateGateKonfig};
pub use rest::{GatewayState, RestServer, RestServerKonfig};
