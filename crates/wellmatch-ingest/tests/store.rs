use std::io::Write;
use std::sync::Arc;
use std::thread;

use wellmatch_ingest::{
    CancelToken, FileSource, IngestError, RegistrySource, RegistryStore, StaticSource,
    load_registry, sha256_hex,
};

const REGISTRY: &str = "name,specialty,symptoms\nDr. A,Neuro,headache\nDr. B,Ortho,joint pain\n";

/// Source that trips its own cancel token mid-fetch, like a caller giving up
/// while a download is in flight.
struct CancellingSource {
    token: CancelToken,
}

impl RegistrySource for CancellingSource {
    fn describe(&self) -> String {
        "cancelling".to_string()
    }

    fn fetch(&self, _cancel: &CancelToken) -> wellmatch_ingest::Result<String> {
        self.token.cancel();
        Ok(REGISTRY.to_string())
    }
}

#[test]
fn store_is_unavailable_until_first_load() {
    let store = RegistryStore::new();
    assert!(!store.is_loaded());
    assert!(matches!(
        store.snapshot(),
        Err(IngestError::RegistryUnavailable)
    ));
}

#[test]
fn refresh_publishes_a_fingerprinted_snapshot() {
    let store = RegistryStore::new();
    let summary = store
        .refresh(&StaticSource::new("inline", REGISTRY), &CancelToken::new())
        .expect("refresh");

    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.rejected, 0);
    assert!(summary.changed);
    assert_eq!(summary.fingerprint, sha256_hex(REGISTRY.as_bytes()));

    let snapshot = store.snapshot().expect("snapshot");
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.source, "inline");

    let again = store
        .refresh(&StaticSource::new("inline", REGISTRY), &CancelToken::new())
        .expect("second refresh");
    assert!(!again.changed);
}

#[test]
fn failed_refresh_keeps_previous_snapshot() {
    let store = RegistryStore::new();
    store
        .refresh(&StaticSource::new("good", REGISTRY), &CancelToken::new())
        .expect("initial refresh");

    let err = store
        .refresh(
            &StaticSource::new("empty", "name,specialty\n,\n"),
            &CancelToken::new(),
        )
        .unwrap_err();
    assert!(matches!(err, IngestError::EmptyRegistry { .. }));
    assert_eq!(store.snapshot().expect("snapshot").source, "good");
}

#[test]
fn cancellation_during_fetch_publishes_nothing() {
    let token = CancelToken::new();
    let source = CancellingSource {
        token: token.clone(),
    };
    let store = RegistryStore::new();

    let err = store.refresh(&source, &token).unwrap_err();
    assert!(matches!(err, IngestError::Cancelled { .. }));
    assert!(!store.is_loaded());
}

#[test]
fn file_source_loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(REGISTRY.as_bytes()).expect("write registry");
    file.flush().expect("flush");

    let loaded = load_registry(&FileSource::new(file.path()), &CancelToken::new())
        .expect("load from file");
    assert_eq!(loaded.snapshot.len(), 2);
    assert!(loaded.rejected.is_empty());
}

#[test]
fn readers_keep_their_snapshot_across_swaps() {
    let store = Arc::new(RegistryStore::new());
    store
        .refresh(&StaticSource::new("first", REGISTRY), &CancelToken::new())
        .expect("first refresh");
    let held = store.snapshot().expect("held snapshot");

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let text = format!("{REGISTRY}Dr. C,Skin,rash\n");
            store
                .refresh(&StaticSource::new("second", text), &CancelToken::new())
                .expect("second refresh")
        })
    };
    let summary = writer.join().expect("writer thread");

    assert_eq!(summary.accepted, 3);
    assert_eq!(held.len(), 2);
    assert_eq!(held.source, "first");
    assert_eq!(store.snapshot().expect("new snapshot").len(), 3);
}
