use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::input::cache::{SnapshotStore, StoreError};
use crate::input::{InputError, ResponseSource};
use crate::model::snapshot::Snapshot;
use crate::model::thresholds::AnalysisProfile;
use crate::pipeline::stage6_snapshot::{Stage6Input, build_snapshot, first_non_finite};

#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("refresh already in progress")]
    Busy,
    #[error("failed to load responses: {0}")]
    Input(#[from] InputError),
    #[error("snapshot computation panicked: {0}")]
    Panicked(String),
    #[error("non-finite statistic in {0}")]
    NonFinite(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotState {
    Uninitialized,
    Ready,
    Replaced,
}

#[derive(Debug, Default)]
struct Slot {
    snapshot: Option<Arc<Snapshot>>,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct SnapshotCell {
    slot: RwLock<Slot>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> Arc<SnapshotCell> {
        static GLOBAL: OnceLock<Arc<SnapshotCell>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(SnapshotCell::new())).clone()
    }

    pub fn get(&self) -> Option<Arc<Snapshot>> {
        self.slot.read().snapshot.clone()
    }

    pub fn state(&self) -> SnapshotState {
        match self.slot.read().generation {
            0 => SnapshotState::Uninitialized,
            1 => SnapshotState::Ready,
            _ => SnapshotState::Replaced,
        }
    }

    pub fn generation(&self) -> u64 {
        self.slot.read().generation
    }

    pub fn replace(&self, snapshot: Arc<Snapshot>) -> Option<Arc<Snapshot>> {
        let mut slot = self.slot.write();
        slot.generation += 1;
        slot.snapshot.replace(snapshot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshOutcome {
    pub success: bool,
    pub message: String,
    pub processed: u64,
    pub skipped: u64,
    pub duration_ms: u64,
}

pub struct Orchestrator {
    profile: AnalysisProfile,
    cell: Arc<SnapshotCell>,
    store: Option<Box<dyn SnapshotStore>>,
    refresh_lock: Mutex<()>,
}

impl Orchestrator {
    pub fn new(profile: AnalysisProfile) -> Self {
        Self::with_cell(profile, Arc::new(SnapshotCell::new()))
    }

    pub fn with_cell(profile: AnalysisProfile, cell: Arc<SnapshotCell>) -> Self {
        Self {
            profile,
            cell,
            store: None,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn with_store(mut self, store: Box<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn profile(&self) -> &AnalysisProfile {
        &self.profile
    }

    pub fn cell(&self) -> &Arc<SnapshotCell> {
        &self.cell
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.cell.get()
    }

    /// Rebuilds the snapshot from `source`. A refresh that is already
    /// running makes this one fail immediately; on any failure the previous
    /// snapshot stays current.
    pub fn refresh(&self, source: &dyn ResponseSource) -> RefreshOutcome {
        let started = Instant::now();
        let result = match self.refresh_lock.try_lock() {
            Some(_guard) => self.rebuild(source),
            None => Err(ComputeError::Busy),
        };
        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(snapshot) => RefreshOutcome {
                success: true,
                message: format!(
                    "processed {} responses ({} rows skipped)",
                    snapshot.metadata.processed_responses, snapshot.metadata.skipped_rows
                ),
                processed: snapshot.metadata.processed_responses,
                skipped: snapshot.metadata.skipped_rows,
                duration_ms,
            },
            Err(err) => {
                match err {
                    ComputeError::Busy => warn!("refresh rejected: {err}"),
                    _ => error!("refresh failed: {err}"),
                }
                RefreshOutcome {
                    success: false,
                    message: err.to_string(),
                    processed: 0,
                    skipped: 0,
                    duration_ms,
                }
            }
        }
    }

    pub fn current_or_refresh(
        &self,
        source: &dyn ResponseSource,
    ) -> Result<Arc<Snapshot>, ComputeError> {
        if let Some(snapshot) = self.cell.get() {
            return Ok(snapshot);
        }
        let _guard = self.refresh_lock.lock();
        if let Some(snapshot) = self.cell.get() {
            return Ok(snapshot);
        }
        self.rebuild(source)
    }

    pub fn warm_start(&self) -> Result<Option<Arc<Snapshot>>, StoreError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let _guard = self.refresh_lock.lock();
        if let Some(current) = self.cell.get() {
            return Ok(Some(current));
        }
        match store.load()? {
            Some(snapshot) => {
                info!(
                    responses = snapshot.total_responses(),
                    computed_at = %snapshot.metadata.computed_at,
                    "warm start from snapshot cache"
                );
                let snapshot = Arc::new(snapshot);
                self.cell.replace(snapshot.clone());
                Ok(Some(snapshot))
            }
            None => {
                info!("snapshot cache is cold");
                Ok(None)
            }
        }
    }

    /// Caller holds `refresh_lock`.
    fn rebuild(&self, source: &dyn ResponseSource) -> Result<Arc<Snapshot>, ComputeError> {
        let profile = &self.profile;
        let built = panic::catch_unwind(AssertUnwindSafe(|| -> Result<Snapshot, ComputeError> {
            let batch = source.fetch()?;
            let skipped_rows = batch.skipped_rows();
            Ok(build_snapshot(
                Stage6Input {
                    responses: batch.responses,
                    skipped_rows,
                },
                profile,
            ))
        }))
        .map_err(|payload| ComputeError::Panicked(panic_message(payload.as_ref())))??;

        if let Some(field) = first_non_finite(&built) {
            return Err(ComputeError::NonFinite(field));
        }

        let snapshot = Arc::new(built);
        self.cell.replace(snapshot.clone());
        info!(
            generation = self.cell.generation(),
            responses = snapshot.total_responses(),
            computation_ms = snapshot.metadata.computation_ms,
            "snapshot published"
        );
        if let Some(store) = &self.store {
            if let Err(err) = store.store(&snapshot) {
                warn!("failed to persist snapshot: {err}");
            }
        }
        Ok(snapshot)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/orchestrator/tests.rs"]
mod tests;
