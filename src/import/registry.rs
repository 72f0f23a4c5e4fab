//! In-memory view of import runs, readable while a run is still going.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use super::{ImportError, ImportReport};

/// How long a settled run stays readable before `start` drops it.
pub const RUN_RETENTION_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Running,
    Finished,
    Aborted,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunStatus {
    pub state: RunState,
    pub report: ImportReport,
    /// Why an aborted run stopped.
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// batch id → latest status. Cheap to clone; clones share the map.
#[derive(Debug, Clone, Default)]
pub struct ImportRegistry {
    runs: Arc<DashMap<Uuid, RunStatus>>,
}

impl ImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, batch_id: Uuid, total_rows: usize) {
        let pruned = self.prune(Utc::now(), Duration::hours(RUN_RETENTION_HOURS));
        if pruned > 0 {
            log::debug!("dropped {pruned} settled import runs");
        }
        self.runs.insert(
            batch_id,
            RunStatus {
                state: RunState::Running,
                report: ImportReport::new(batch_id, total_rows),
                error: None,
                started_at: Utc::now(),
                finished_at: None,
            },
        );
    }

    pub fn update(&self, report: &ImportReport) {
        if let Some(mut run) = self.runs.get_mut(&report.batch_id) {
            run.report = report.clone();
        }
    }

    pub fn finish(&self, report: ImportReport) {
        if let Some(mut run) = self.runs.get_mut(&report.batch_id) {
            run.state = RunState::Finished;
            run.report = report;
            run.finished_at = Some(Utc::now());
        }
    }

    pub fn abort(&self, batch_id: Uuid, error: String) {
        if let Some(mut run) = self.runs.get_mut(&batch_id) {
            run.state = RunState::Aborted;
            run.error = Some(error);
            run.finished_at = Some(Utc::now());
        }
    }

    pub fn get(&self, batch_id: Uuid) -> Option<RunStatus> {
        self.runs.get(&batch_id).map(|e| e.value().clone())
    }

    /// A run still inserting rows cannot be rolled back.
    pub fn ensure_settled(&self, batch_id: Uuid) -> Result<(), ImportError> {
        match self.runs.get(&batch_id) {
            Some(run) if run.state == RunState::Running => Err(ImportError::RunInProgress(batch_id)),
            _ => Ok(()),
        }
    }

    /// Forget a settled run after it has been rolled back. Running entries stay.
    pub fn remove(&self, batch_id: Uuid) -> Option<RunStatus> {
        self.runs
            .remove_if(&batch_id, |_, run| run.state != RunState::Running)
            .map(|(_, run)| run)
    }

    /// Drop finished or aborted runs that settled more than `retention` before
    /// `now`. Returns how many were dropped.
    pub fn prune(&self, now: DateTime<Utc>, retention: Duration) -> usize {
        let cutoff = now - retention;
        let mut dropped = 0;
        self.runs.retain(|_, run| {
            let keep = run.finished_at.map_or(true, |at| at > cutoff);
            if !keep {
                dropped += 1;
            }
            keep
        });
        dropped
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}
