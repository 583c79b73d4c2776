//! Rate-Gate fuer das MuipGate Gateway
//!
//! Gleitendes 1-Sekunden-Fenster pro Kennung (Ziel-UID) mit fester
//! Sperrstrafe bei Ueberschreitung. Der Schutz ist bewusst approximativ:
//! gleichzeitige Anfragen derselben Kennung werden nur durch den Mutex
//! serialisiert, nicht weitergehend koordiniert.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Konfiguration fuer das Rate-Gate
#[derive(Debug, Clone)]
pub struct RateGateKonfig {
    /// Fensterlaenge des gleitenden Zaehlfensters
    pub fenster: Duration,
    /// Maximal erlaubte Anfragen innerhalb eines Fensters
    pub max_anfragen: u32,
    /// Sperrdauer nach Ueberschreitung
    pub sperrdauer: Duration,
    /// Eintraege ohne Aktivitaet laenger als dieser Wert werden beim
    /// Aufraeumen entfernt
    pub leerlauf: Duration,
}

impl Default for RateGateKonfig {
    fn default() -> Self {
        Self {
            fenster: Duration::from_millis(1000),
            max_anfragen: 2,
            sperrdauer: Duration::from_millis(30_000),
            leerlauf: Duration::from_secs(5 * 60),
        }
    }
}

/// Zustand einer einzelnen Kennung
#[derive(Debug)]
struct KennungsEintrag {
    /// Anfragen im aktuellen Fenster
    anzahl: u32,
    /// Beginn des aktuellen Fensters
    fenster_start: Instant,
    /// Aktive Sperre, falls vorhanden
    gesperrt_bis: Option<Instant>,
    /// Letzte Aktivitaet (fuer das Aufraeumen)
    zuletzt_gesehen: Instant,
}

/// Entscheidung des Rate-Gates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEntscheid {
    Erlaubt,
    Abgelehnt { retry_after: Duration },
}

impl GateEntscheid {
    pub fn ist_erlaubt(&self) -> bool {
        matches!(self, Self::Erlaubt)
    }
}

/// Rate-Gate mit gleitendem Fenster und Sperrstrafe
///
/// Der gesamte Zustand lebt im Prozess; das periodische Aufraeumen
/// verhindert unbegrenztes Wachstum bei stetig neuen Kennungen.
pub struct RateGate {
    konfig: RateGateKonfig,
    eintraege: Mutex<HashMap<String, KennungsEintrag>>,
}

impl RateGate {
    pub fn neu(konfig: RateGateKonfig) -> Arc<Self> {
        Arc::new(Self {
            konfig,
            eintraege: Mutex::new(HashMap::new()),
        })
    }

    /// Prueft eine Anfrage fuer die gegebene Kennung.
    ///
    /// Die Kennung ist ein opaker String; leere Kennungen weist die
    /// HTTP-Schicht bereits vorher als Validierungsfehler ab.
    pub fn pruefen(&self, kennung: &str) -> GateEntscheid {
        self.pruefen_um(kennung, Instant::now())
    }

    fn pruefen_um(&self, kennung: &str, jetzt: Instant) -> GateEntscheid {
        let mut eintraege = self.eintraege.lock();
        let eintrag = eintraege
            .entry(kennung.to_string())
            .or_insert_with(|| KennungsEintrag {
                anzahl: 0,
                fenster_start: jetzt,
                gesperrt_bis: None,
                zuletzt_gesehen: jetzt,
            });
        eintrag.zuletzt_gesehen = jetzt;

        // Aktive Sperre: sofort ablehnen, Zaehler unangetastet lassen,
        // Sperre nicht verlaengern
        if let Some(bis) = eintrag.gesperrt_bis {
            if jetzt < bis {
                return GateEntscheid::Abgelehnt {
                    retry_after: bis - jetzt,
                };
            }
            // Sperre abgelaufen: naechster Aufruf startet ein frisches Fenster
            eintrag.gesperrt_bis = None;
            eintrag.anzahl = 0;
            eintrag.fenster_start = jetzt;
        }

        if jetzt.duration_since(eintrag.fenster_start) >= self.konfig.fenster {
            eintrag.anzahl = 1;
            eintrag.fenster_start = jetzt;
        } else {
            eintrag.anzahl += 1;
        }

        if eintrag.anzahl > self.konfig.max_anfragen {
            eintrag.gesperrt_bis = Some(jetzt + self.konfig.sperrdauer);
            tracing::warn!(kennung, "Rate-Limit ueberschritten, Kennung gesperrt");
            return GateEntscheid::Abgelehnt {
                retry_after: self.konfig.sperrdauer,
            };
        }

        GateEntscheid::Erlaubt
    }

    /// Entfernt Eintraege ohne Aktivitaet (Speicher-Management).
    ///
    /// Der Leerlauf-Schwellwert liegt deutlich ueber der Sperrdauer,
    /// damit eine aktive Sperre nie vorzeitig vergessen wird.
    pub fn aufraeumen(&self) {
        let jetzt = Instant::now();
        let mut eintraege = self.eintraege.lock();
        let vorher = eintraege.len();
        eintraege.retain(|_, e| jetzt.duration_since(e.zuletzt_gesehen) < self.konfig.leerlauf);
        let entfernt = vorher - eintraege.len();
        if entfernt > 0 {
            tracing::debug!(entfernt, verbleibend = eintraege.len(), "Rate-Gate aufgeraeumt");
        }
    }

    /// Anzahl der aktuell gehaltenen Kennungen
    pub fn eintrag_anzahl(&self) -> usize {
        self.eintraege.lock().len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_gate() -> Arc<RateGate> {
        RateGate::neu(RateGateKonfig::default())
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn erste_anfrage_neuer_kennung_ist_erlaubt() {
        let gate = test_gate();
        assert!(gate.pruefen("u1").ist_erlaubt());
    }

    #[test]
    fn beispiel_aus_der_protokollbeschreibung() {
        // t=0, 100, 200 -> erlaubt, erlaubt, abgelehnt + Sperre bis t=30200;
        // t=500 -> weiter abgelehnt; t=31000 -> erlaubt (frisches Fenster)
        let gate = test_gate();
        let t0 = Instant::now();

        assert!(gate.pruefen_um("u1", t0).ist_erlaubt());
        assert!(gate.pruefen_um("u1", t0 + ms(100)).ist_erlaubt());

        match gate.pruefen_um("u1", t0 + ms(200)) {
            GateEntscheid::Abgelehnt { retry_after } => assert_eq!(retry_after, ms(30_000)),
            GateEntscheid::Erlaubt => panic!("dritte Anfrage muss abgelehnt werden"),
        }

        assert!(!gate.pruefen_um("u1", t0 + ms(500)).ist_erlaubt());
        assert!(gate.pruefen_um("u1", t0 + ms(31_000)).ist_erlaubt());
    }

    #[test]
    fn sperre_wird_durch_weitere_versuche_nicht_verlaengert() {
        let gate = test_gate();
        let t0 = Instant::now();

        gate.pruefen_um("u1", t0);
        gate.pruefen_um("u1", t0 + ms(100));
        gate.pruefen_um("u1", t0 + ms(200)); // Sperre bis t0+30200

        // Versuch mitten in der Sperre: Restzeit schrumpft, Ende bleibt
        match gate.pruefen_um("u1", t0 + ms(10_200)) {
            GateEntscheid::Abgelehnt { retry_after } => assert_eq!(retry_after, ms(20_000)),
            GateEntscheid::Erlaubt => panic!("Sperre muss aktiv sein"),
        }
        // Trotz des Versuchs endet die Sperre zum urspruenglichen Zeitpunkt
        assert!(gate.pruefen_um("u1", t0 + ms(30_300)).ist_erlaubt());
    }

    #[test]
    fn nach_sperrablauf_beginnt_ein_frisches_fenster() {
        let gate = test_gate();
        let t0 = Instant::now();

        gate.pruefen_um("u1", t0);
        gate.pruefen_um("u1", t0 + ms(100));
        gate.pruefen_um("u1", t0 + ms(200));

        let t1 = t0 + ms(31_000);
        assert!(gate.pruefen_um("u1", t1).ist_erlaubt()); // Zaehler = 1
        assert!(gate.pruefen_um("u1", t1 + ms(100)).ist_erlaubt()); // Zaehler = 2
        assert!(!gate.pruefen_um("u1", t1 + ms(200)).ist_erlaubt());
    }

    #[test]
    fn fenster_reset_nach_einer_sekunde() {
        let gate = test_gate();
        let t0 = Instant::now();

        assert!(gate.pruefen_um("u1", t0).ist_erlaubt());
        assert!(gate.pruefen_um("u1", t0 + ms(999)).ist_erlaubt());
        // >= 1000ms nach Fensterbeginn: Zaehler beginnt wieder bei 1
        assert!(gate.pruefen_um("u1", t0 + ms(1000)).ist_erlaubt());
        assert!(gate.pruefen_um("u1", t0 + ms(1100)).ist_erlaubt());
        assert!(!gate.pruefen_um("u1", t0 + ms(1200)).ist_erlaubt());
    }

    #[test]
    fn kennungen_sind_unabhaengig() {
        let gate = test_gate();
        let t0 = Instant::now();

        gate.pruefen_um("u1", t0);
        gate.pruefen_um("u1", t0 + ms(50));
        assert!(!gate.pruefen_um("u1", t0 + ms(100)).ist_erlaubt());

        // Andere Kennung bleibt unbehelligt
        assert!(gate.pruefen_um("u2", t0 + ms(100)).ist_erlaubt());
    }

    #[test]
    fn aufraeumen_entfernt_nur_leerlauf_eintraege() {
        let gate = RateGate::neu(RateGateKonfig {
            leerlauf: Duration::from_millis(100),
            ..RateGateKonfig::default()
        });

        // Eintrag mit Aktivitaet weit in der Vergangenheit
        {
            let mut eintraege = gate.eintraege.lock();
            let alt = Instant::now() - Duration::from_millis(200);
            eintraege.insert(
                "verwaist".into(),
                KennungsEintrag {
                    anzahl: 1,
                    fenster_start: alt,
                    gesperrt_bis: None,
                    zuletzt_gesehen: alt,
                },
            );
        }
        gate.pruefen("frisch");
        assert_eq!(gate.eintrag_anzahl(), 2);

        gate.aufraeumen();
        assert_eq!(gate.eintrag_anzahl(), 1);
        // Der frische Eintrag behaelt seinen Fensterzustand
        assert!(gate.pruefen("frisch").ist_erlaubt());
    }
}
