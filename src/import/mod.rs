//! Bulk member registration from an uploaded CSV file.

pub mod csv;
pub mod registry;
pub mod runner;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::MemberBackend;
use crate::db::models::{NewPlayer, Role};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV contains no data rows")]
    Empty,
    #[error("no import run {0}")]
    UnknownRun(Uuid),
    #[error("rollback of batch {0} requires confirmation")]
    ConfirmationRequired(Uuid),
    #[error("import run {0} is still in progress")]
    RunInProgress(Uuid),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// The member fields a CSV line contributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportRow {
    pub line: usize,
    pub full_name: String,
    pub email: String,
    pub country: String,
    pub troop_type: String,
    pub rank_name: Option<String>,
    pub might: Option<i64>,
    pub igg_id: Option<String>,
    pub discord_id: Option<String>,
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_owned())
}

impl ImportRow {
    pub fn from_csv(row: &csv::CsvRow) -> Self {
        Self {
            line: row.line,
            full_name: row.get("full_name").to_owned(),
            email: row.get("email").to_owned(),
            country: row.get("country").to_owned(),
            troop_type: row.get("troop_type").to_owned(),
            rank_name: non_empty(row.get("rank_name")),
            might: row.get("might").parse().ok(),
            igg_id: non_empty(row.get("igg_id")),
            discord_id: non_empty(row.get("discord_id")),
        }
    }

    pub fn to_new_player(&self, auth_id: Uuid, rank_id: Option<Uuid>, batch_id: Uuid) -> NewPlayer {
        NewPlayer {
            auth_id: Some(auth_id),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            country: self.country.clone(),
            troop_type: self.troop_type.clone(),
            igg_id: self.igg_id.clone(),
            discord_id: self.discord_id.clone(),
            might: self.might.unwrap_or(0),
            rank_id,
            role: Role::Member,
            batch_id: Some(batch_id),
        }
    }
}

/// Parse `text` into import rows, in file order.
pub fn rows_from_csv(text: &str) -> Vec<ImportRow> {
    csv::parse(text).rows.iter().map(ImportRow::from_csv).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    pub email: String,
    pub error: String,
}

/// Running and final tally of one import run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub batch_id: Uuid,
    pub total_rows: usize,
    pub processed: usize,
    /// Rounded share of rows processed, 0–100.
    pub percent: u8,
    pub succeeded: usize,
    pub skipped: usize,
    pub failures: Vec<RowFailure>,
}

impl ImportReport {
    pub fn new(batch_id: Uuid, total_rows: usize) -> Self {
        Self {
            batch_id,
            total_rows,
            processed: 0,
            percent: 0,
            succeeded: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Undo a run: delete every player (and account) tagged with `batch_id`.
/// Refuses unless the caller confirmed.
pub async fn rollback(
    backend: &dyn MemberBackend,
    batch_id: Uuid,
    confirmed: bool,
) -> Result<u64, ImportError> {
    if !confirmed {
        return Err(ImportError::ConfirmationRequired(batch_id));
    }
    let deleted = backend.delete_batch(batch_id).await?;
    log::info!("rolled back import batch {batch_id}: {deleted} players removed");
    Ok(deleted)
}
