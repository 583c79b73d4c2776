//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! Standardwerte, sodass das Gateway ohne Konfigurationsdatei startet;
//! ohne gesetzten Admin-Schluessel wird der Dispatch-Server jede
//! Autorisierung ablehnen, darum warnt der Start in dem Fall.

use serde::{Deserialize, Serialize};

use muipgate_core::SchluesselTyp;

/// Vollstaendige Gateway-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP-Einstellungen des Gateways
    pub server: ServerEinstellungen,
    /// Anbindung an den Dispatch-Server
    pub dispatch: DispatchEinstellungen,
    /// Rate-Gate-Einstellungen
    pub rate_limit: RateLimitEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Konsolen-Einstellungen (stdin + WebSocket)
    pub konsole: KonsolenEinstellungen,
}

/// HTTP-Einstellungen des Gateways
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Bind-Adresse des REST-Servers
    pub bind_adresse: String,
    /// Port des REST-Servers
    pub port: u16,
    /// CORS-Origins (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec![],
        }
    }
}

/// Anbindung an den Dispatch-Server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchEinstellungen {
    /// Basis-URL des Dispatch-Servers
    pub url: String,
    /// Admin-Schluessel fuer die Session-Autorisierung
    pub admin_schluessel: String,
    /// Schluesselformat beim Session-Aufbau
    pub schluessel_typ: SchluesselTyp,
    /// Zeitlimit pro Dispatch-Aufruf in Sekunden
    pub timeout_sekunden: u64,
}

impl Default for DispatchEinstellungen {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:443".into(),
            admin_schluessel: String::new(),
            schluessel_typ: SchluesselTyp::Pem,
            timeout_sekunden: 10,
        }
    }
}

/// Rate-Gate-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitEinstellungen {
    /// Maximale Anfragen pro Fenster und Kennung
    pub max_anfragen: u32,
    /// Fensterlaenge in Millisekunden
    pub fenster_ms: u64,
    /// Sperrdauer in Millisekunden
    pub sperrdauer_ms: u64,
    /// Leerlauf in Sekunden bevor ein Eintrag aufgeraeumt wird
    pub leerlauf_sekunden: u64,
    /// Intervall des Aufraeum-Tasks in Sekunden
    pub aufraeum_intervall_sekunden: u64,
}

impl Default for RateLimitEinstellungen {
    fn default() -> Self {
        Self {
            max_anfragen: 2,
            fenster_ms: 1000,
            sperrdauer_ms: 30_000,
            leerlauf_sekunden: 300,
            aufraeum_intervall_sekunden: 60,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Konsolen-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KonsolenEinstellungen {
    /// Aktiviert die stdin-Konsole
    pub stdin_aktiv: bool,
    /// Aktiviert den Log-Spiegel fuer WebSocket-Clients
    pub ws_aktiv: bool,
    /// Puffer-Kapazitaet des Log-Spiegels (Zeilen)
    pub puffer: usize,
}

impl Default for KonsolenEinstellungen {
    fn default() -> Self {
        Self {
            stdin_aktiv: true,
            ws_aktiv: true,
            puffer: 256,
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Gibt die Bind-Adresse fuer den REST-Server zurueck
    pub fn rest_bind_adresse(&self) -> String {
        format!("{}:{}", self.server.bind_adresse, self.server.port)
    }
}
