//! muipgate-server - Bibliotheks-Root
//!
//! Deklariert die Server-Module und verdrahtet beim Start alle
//! Subsysteme: Dispatch-Client, Befehls-Pipeline, Rate-Gate,
//! Konsolen-Tasks und den REST-Server.

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use config::ServerConfig;
use muipgate_dispatch::{CommandPipeline, DispatchClient, DispatchClientKonfig};
use muipgate_gateway::konsole;
use muipgate_gateway::{GatewayState, RateGate, RateGateKonfig, RestServer, RestServerKonfig};
use muipgate_observability::LogSpiegel;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    config: ServerConfig,
    log_spiegel: Option<LogSpiegel>,
}

impl Server {
    /// Erstellt einen neuen Server aus Konfiguration und optionalem
    /// Log-Spiegel (der Spiegel muss bereits am Subscriber haengen)
    pub fn neu(config: ServerConfig, log_spiegel: Option<LogSpiegel>) -> Self {
        Self {
            config,
            log_spiegel,
        }
    }

    /// Startet alle Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Dispatch-Client und Befehls-Pipeline aufbauen
    /// 2. Rate-Gate samt Aufraeum-Task starten
    /// 3. stdin-Konsole starten (falls aktiviert)
    /// 4. REST-Server bedienen bis Ctrl-C / SIGTERM
    pub async fn starten(self) -> Result<()> {
        if self.config.dispatch.admin_schluessel.is_empty() {
            tracing::warn!(
                "Kein Admin-Schluessel konfiguriert; der Dispatch-Server wird Autorisierungen ablehnen"
            );
        }

        let client = DispatchClient::neu(&DispatchClientKonfig {
            basis_url: self.config.dispatch.url.clone(),
            timeout: Duration::from_secs(self.config.dispatch.timeout_sekunden),
        })?;
        let pipeline = Arc::new(CommandPipeline::neu(
            client,
            self.config.dispatch.admin_schluessel.clone(),
            self.config.dispatch.schluessel_typ,
        ));
        tracing::info!(dispatch_url = %self.config.dispatch.url, "Dispatch-Anbindung bereit");

        let rate_gate = RateGate::neu(RateGateKonfig {
            fenster: Duration::from_millis(self.config.rate_limit.fenster_ms),
            max_anfragen: self.config.rate_limit.max_anfragen,
            sperrdauer: Duration::from_millis(self.config.rate_limit.sperrdauer_ms),
            leerlauf: Duration::from_secs(self.config.rate_limit.leerlauf_sekunden),
        });
        aufraeum_task_starten(
            rate_gate.clone(),
            Duration::from_secs(self.config.rate_limit.aufraeum_intervall_sekunden),
        );

        let state = GatewayState::neu(pipeline, rate_gate, self.log_spiegel.clone());

        if self.config.konsole.stdin_aktiv {
            konsole::stdin_konsole_starten(state.clone());
            tracing::info!("stdin-Konsole aktiv. Format: command:'<befehl>' uid:'<uid>'");
        }

        let rest = RestServer::neu(RestServerKonfig {
            bind_addr: self.config.rest_bind_adresse().parse()?,
            cors_origins: self.config.server.cors_origins.clone(),
        });
        rest.starten(state).await
    }
}

/// Startet den periodischen Aufraeum-Task des Rate-Gates
fn aufraeum_task_starten(rate_gate: Arc<RateGate>, intervall: Duration) {
    tokio::spawn(async move {
        let mut takt = tokio::time::interval(intervall);
        // Der erste Tick feuert sofort; ueberspringen
        takt.tick().await;
        loop {
            takt.tick().await;
            rate_gate.aufraeumen();
        }
    });
}
