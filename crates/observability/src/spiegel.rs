//! Log-Spiegel - verteilt formatierte Log-Zeilen an Beobachter
//!
//! Der Spiegel wird beim Aufbau des tracing-Subscribers als zusaetzliche
//! Schicht registriert; zur Laufzeit wird nie eine globale Senke
//! umgebogen. Beobachter (z.B. WebSocket-Konsolen) abonnieren einen
//! Broadcast-Kanal; ohne Abonnenten ist die Schicht ein No-Op.

use std::fmt;

use tokio::sync::broadcast;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Verteiler fuer formatierte Log-Zeilen
#[derive(Clone)]
pub struct LogSpiegel {
    sender: broadcast::Sender<String>,
}

impl LogSpiegel {
    /// Erstellt einen Spiegel mit der gegebenen Puffer-Kapazitaet.
    ///
    /// Langsame Beobachter verlieren bei vollem Puffer die aeltesten
    /// Zeilen (Broadcast-Semantik); das Logging selbst blockiert nie.
    pub fn neu(kapazitaet: usize) -> Self {
        let (sender, _) = broadcast::channel(kapazitaet);
        Self { sender }
    }

    /// Registriert einen neuen Beobachter
    pub fn abonnieren(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    /// Anzahl der aktuell verbundenen Beobachter
    pub fn beobachter(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Tracing-Schicht die Events in den Broadcast-Kanal schreibt
    pub fn schicht(&self) -> SpiegelSchicht {
        SpiegelSchicht {
            sender: self.sender.clone(),
        }
    }
}

impl fmt::Debug for LogSpiegel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogSpiegel {{ beobachter: {} }}", self.beobachter())
    }
}

/// Tracing-Layer des Log-Spiegels
pub struct SpiegelSchicht {
    sender: broadcast::Sender<String>,
}

impl<S: Subscriber> Layer<S> for SpiegelSchicht {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // Ohne Beobachter gar nicht erst formatieren
        if self.sender.receiver_count() == 0 {
            return;
        }

        let mut besucher = NachrichtBesucher::default();
        event.record(&mut besucher);

        if let Some(nachricht) = besucher.nachricht {
            let zeile = format!("[{}] {}", event.metadata().level(), nachricht);
            let _ = self.sender.send(zeile);
        }
    }
}

/// Visitor der nur das `message`-Feld eines Events einsammelt
#[derive(Default)]
struct NachrichtBesucher {
    nachricht: Option<String>,
}

impl Visit for NachrichtBesucher {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.nachricht = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.nachricht = Some(format!("{value:?}"));
        }
    }
}
