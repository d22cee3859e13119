use std::sync::{Arc, Barrier};
use std::thread;

use super::{ComputeError, Orchestrator, SnapshotCell, SnapshotState};
use crate::input::cache::{MemoryStore, SnapshotStore, StoreError};
use crate::input::{InputError, LoadedResponses, ResponseSource, RowError, StaticSource};
use crate::model::response::{Response, Vote};
use crate::model::snapshot::Snapshot;
use crate::model::thresholds::AnalysisProfile;

fn response(id: u64, q1: Vote, comment: &str) -> Response {
    Response {
        id,
        timestamp: None,
        name: String::new(),
        roll_no: String::new(),
        course: "PhD".to_string(),
        year: "1st Year".to_string(),
        q1: Some(q1),
        q2: Some(Vote::No),
        comment: comment.to_string(),
    }
}

fn source(n: u64) -> StaticSource {
    StaticSource {
        batch: LoadedResponses {
            responses: (1..=n)
                .map(|id| response(id, Vote::No, "Privacy is a real worry for all of us"))
                .collect(),
            skipped: vec![RowError {
                row: n + 1,
                reason: "q1: unrecognized vote value \"Maybe\"".to_string(),
            }],
        },
    }
}

struct FailingSource;

impl ResponseSource for FailingSource {
    fn fetch(&self) -> Result<LoadedResponses, InputError> {
        Err(InputError::Empty("no header row".to_string()))
    }
}

struct PanickingSource;

impl ResponseSource for PanickingSource {
    fn fetch(&self) -> Result<LoadedResponses, InputError> {
        panic!("export reader blew up");
    }
}

/// Blocks inside `fetch` until the test releases it.
struct GatedSource {
    gate: Barrier,
    inner: StaticSource,
}

impl ResponseSource for GatedSource {
    fn fetch(&self) -> Result<LoadedResponses, InputError> {
        self.gate.wait();
        self.gate.wait();
        self.inner.fetch()
    }
}

#[test]
fn test_refresh_publishes_snapshot() {
    let orch = Orchestrator::new(AnalysisProfile::default_v1());
    assert_eq!(orch.cell().state(), SnapshotState::Uninitialized);
    assert!(orch.current().is_none());

    let outcome = orch.refresh(&source(4));
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.processed, 4);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(orch.cell().state(), SnapshotState::Ready);
    assert_eq!(orch.current().unwrap().total_responses(), 4);

    assert!(orch.refresh(&source(6)).success);
    assert_eq!(orch.cell().state(), SnapshotState::Replaced);
    assert_eq!(orch.current().unwrap().total_responses(), 6);
}

#[test]
fn test_failed_refresh_keeps_previous_snapshot() {
    let orch = Orchestrator::new(AnalysisProfile::default_v1());
    assert!(orch.refresh(&source(3)).success);
    let before = orch.current().unwrap();

    let outcome = orch.refresh(&FailingSource);
    assert!(!outcome.success);
    assert!(outcome.message.contains("failed to load responses"));
    assert_eq!(outcome.processed, 0);
    assert!(Arc::ptr_eq(&before, &orch.current().unwrap()));
    assert_eq!(orch.cell().generation(), 1);
}

#[test]
fn test_panicking_build_is_contained() {
    let orch = Orchestrator::new(AnalysisProfile::default_v1());
    assert!(orch.refresh(&source(2)).success);
    let outcome = orch.refresh(&PanickingSource);
    assert!(!outcome.success);
    assert!(outcome.message.contains("export reader blew up"));
    assert_eq!(orch.current().unwrap().total_responses(), 2);

    // The refresh lock is released after a panic.
    assert!(orch.refresh(&source(5)).success);
    assert_eq!(orch.current().unwrap().total_responses(), 5);
}

#[test]
fn test_concurrent_refresh_is_rejected() {
    let orch = Orchestrator::new(AnalysisProfile::default_v1());
    let gated = GatedSource {
        gate: Barrier::new(2),
        inner: source(3),
    };
    thread::scope(|s| {
        let running = s.spawn(|| orch.refresh(&gated));
        gated.gate.wait();

        let rejected = orch.refresh(&source(9));
        assert!(!rejected.success);
        assert_eq!(rejected.message, "refresh already in progress");

        gated.gate.wait();
        let finished = running.join().unwrap();
        assert!(finished.success);
    });
    assert_eq!(orch.current().unwrap().total_responses(), 3);
    assert_eq!(orch.cell().generation(), 1);
}

#[test]
fn test_current_or_refresh_computes_once() {
    let orch = Orchestrator::new(AnalysisProfile::default_v1());
    let first = orch.current_or_refresh(&source(2)).unwrap();
    let second = orch.current_or_refresh(&source(7)).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.total_responses(), 2);

    let cold = Orchestrator::new(AnalysisProfile::default_v1());
    let err = cold.current_or_refresh(&FailingSource).unwrap_err();
    assert!(matches!(err, ComputeError::Input(_)));
    assert!(cold.current().is_none());
}

#[test]
fn test_refresh_persists_and_warm_start_restores() {
    let store = MemoryStore::new();
    let orch = Orchestrator::new(AnalysisProfile::default_v1()).with_store(Box::new(store));
    assert!(orch.warm_start().unwrap().is_none());
    assert!(orch.refresh(&source(4)).success);

    let persisted = orch.current().unwrap();
    let restored_store = MemoryStore::with_snapshot((*persisted).clone());
    let restarted =
        Orchestrator::new(AnalysisProfile::default_v1()).with_store(Box::new(restored_store));
    let warm = restarted.warm_start().unwrap().unwrap();
    assert_eq!(warm.total_responses(), 4);
    assert_eq!(warm.metadata.computed_at, persisted.metadata.computed_at);
    assert_eq!(restarted.cell().state(), SnapshotState::Ready);
}

#[test]
fn test_warm_start_without_store() {
    let orch = Orchestrator::new(AnalysisProfile::default_v1());
    assert!(orch.warm_start().unwrap().is_none());
    assert_eq!(orch.cell().state(), SnapshotState::Uninitialized);
}

#[test]
fn test_store_receives_refreshed_snapshot() {
    let store = Arc::new(MemoryStore::new());
    let orch = Orchestrator::new(AnalysisProfile::default_v1())
        .with_store(Box::new(SharedStore(store.clone())));
    assert!(orch.refresh(&source(3)).success);
    assert_eq!(store.load().unwrap().unwrap().total_responses(), 3);
}

struct SharedStore(Arc<MemoryStore>);

impl SnapshotStore for SharedStore {
    fn store(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.0.store(snapshot)
    }

    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        self.0.load()
    }
}

#[test]
fn test_global_cell_is_shared() {
    let a = SnapshotCell::global();
    let b = SnapshotCell::global();
    assert!(Arc::ptr_eq(&a, &b));
}
