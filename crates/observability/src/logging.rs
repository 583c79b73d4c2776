//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable:
//! - `MUIPGATE_LOG_LEVEL`: Log-Level (trace/debug/info/warn/error), Standard: info
//! - `MUIPGATE_LOG_FORMAT`: Format (text/json), Standard: text
//!
//! Der optionale [`LogSpiegel`] wird hier einmalig als Schicht
//! registriert; siehe [`crate::spiegel`].

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::spiegel::LogSpiegel;

/// Initialisiert das Logging-System.
///
/// Liest `MUIPGATE_LOG_LEVEL` und `MUIPGATE_LOG_FORMAT` aus der Umgebung;
/// die Parameter aus der Konfigurationsdatei dienen als Fallback.
pub fn logging_initialisieren(level: &str, format: &str, spiegel: Option<&LogSpiegel>) {
    let filter = EnvFilter::try_from_env("MUIPGATE_LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format_env =
        std::env::var("MUIPGATE_LOG_FORMAT").unwrap_or_else(|_| format.to_string());

    let spiegel_schicht = spiegel.map(LogSpiegel::schicht);

    match format_env.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .with(spiegel_schicht)
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true))
                .with(spiegel_schicht)
                .init();
        }
    }
}

/// Validiert ob ein Log-Level-String gueltig ist.
pub fn log_level_gueltig(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}

/// Validiert ob ein Log-Format-String gueltig ist.
pub fn log_format_gueltig(format: &str) -> bool {
    matches!(format, "text" | "json")
}
