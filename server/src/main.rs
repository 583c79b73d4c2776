//! MuipGate Server - Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert Logging samt optionalem
//! Log-Spiegel und startet das Gateway.

use anyhow::Result;
use muipgate_observability::{logging, LogSpiegel};
use muipgate_server::{config::ServerConfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad =
        std::env::var("MUIPGATE_CONFIG").unwrap_or_else(|_| "config.toml".into());

    // Konfiguration laden (Standardwerte falls Datei fehlt)
    let config = ServerConfig::laden(&config_pfad)?;

    if !logging::log_level_gueltig(&config.logging.level) {
        eprintln!(
            "Ungueltiger Log-Level '{}', verwende 'info'",
            config.logging.level
        );
    }

    // Log-Spiegel nur anlegen wenn die WebSocket-Konsole aktiv ist;
    // er muss vor der Subscriber-Initialisierung existieren
    let log_spiegel = config
        .konsole
        .ws_aktiv
        .then(|| LogSpiegel::neu(config.konsole.puffer));

    logging::logging_initialisieren(
        &config.logging.level,
        &config.logging.format,
        log_spiegel.as_ref(),
    );

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "MuipGate wird initialisiert"
    );

    let server = Server::neu(config, log_spiegel);
    server.starten().await?;

    Ok(())
}
