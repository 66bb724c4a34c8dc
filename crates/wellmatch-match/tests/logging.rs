//! Log levels emitted while recommending.

use std::io;
use std::sync::{Arc, Mutex};

use wellmatch_match::{MatchEngine, SelectionStrategy};
use wellmatch_model::{MatchRequest, PractitionerId, PractitionerRecord, RegistrySnapshot};

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn recommend_logged(symptoms: &str) -> (SelectionStrategy, String) {
    let registry = RegistrySnapshot::from_records(vec![
        PractitionerRecord::new(PractitionerId::new("F1").unwrap(), "Dr. F", "General")
            .unwrap()
            .with_symptoms(["fever"])
            .with_rating(Some(4.0)),
    ]);
    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let strategy = tracing::subscriber::with_default(subscriber, || {
        MatchEngine::default()
            .recommend(&registry, &MatchRequest::new(symptoms))
            .unwrap()
            .strategy
    });
    let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (strategy, output)
}

#[test]
fn fallback_escalation_is_a_warning() {
    let (strategy, output) = recommend_logged("xyzzy");
    assert_eq!(strategy, SelectionStrategy::GlobalReputation);
    assert!(
        output.lines().any(|l| l.contains("WARN") && l.contains("by reputation")),
        "{output}"
    );
    assert!(
        output.lines().any(|l| l.contains("INFO") && l.contains("global reputation")),
        "{output}"
    );
}

#[test]
fn primary_selection_logs_scores_at_debug_and_strategy_at_info() {
    let (strategy, output) = recommend_logged("fever");
    assert_eq!(strategy, SelectionStrategy::Primary);
    assert!(!output.contains("WARN"), "{output}");
    assert!(
        output.lines().any(|l| l.contains("DEBUG") && l.contains("scored practitioner")),
        "{output}"
    );
    assert!(
        output.lines().any(|l| l.contains("INFO") && l.contains("recommendation complete")),
        "{output}"
    );
}
