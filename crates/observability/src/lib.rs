//! # muipgate-observability
//!
//! Observability-Crate fuer MuipGate:
//! - Structured Logging via tracing-subscriber (Text oder JSON)
//! - [`LogSpiegel`]: Verteiler der formatierte Log-Zeilen an Beobachter
//!   (WebSocket-Konsolen) weiterreicht
//! - Health-Check-Endpunkt (`/health`)

pub mod health;
pub mod logging;
pub mod spiegel;

pub use health::health_router;
pub use logging::logging_initialisieren;
pub use spiegel::LogSpiegel;
