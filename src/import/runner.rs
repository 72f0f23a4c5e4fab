//! Sequential execution of one bulk-import run.

use uuid::Uuid;

use super::{ImportReport, ImportRow, RowFailure};
use crate::backend::MemberBackend;
use crate::db::models::Rank;
use crate::notify::{credential_notice, Notifier};
use crate::rank;

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Password given to every created account.
    pub default_password: String,
    /// Link placed in credential notices.
    pub portal_url: String,
}

/// Explicit name wins; an unknown name resolves to no rank. Without a name,
/// a might value picks the highest rank it qualifies for.
fn resolve_rank(ranks: &[Rank], row: &ImportRow) -> Option<Uuid> {
    match (&row.rank_name, row.might) {
        (Some(name), _) => rank::find_by_name(ranks, name).map(|r| r.id),
        (None, Some(might)) => rank::classify(ranks, might).map(|r| r.id),
        (None, None) => None,
    }
}

/// Account first, then profile. A failed profile insert removes the account
/// again so no identity is left without a player row.
async fn import_row(
    backend: &dyn MemberBackend,
    ranks: &[Rank],
    row: &ImportRow,
    batch_id: Uuid,
    opts: &ImportOptions,
) -> Result<(), String> {
    let account_id = backend
        .create_account(&row.email, &opts.default_password)
        .await
        .map_err(|e| format!("{e:#}"))?;

    let player = row.to_new_player(account_id, resolve_rank(ranks, row), batch_id);

    if let Err(e) = backend.insert_player(&player).await {
        let mut msg = format!("{e:#}");
        if let Err(ce) = backend.delete_account(account_id).await {
            log::error!("orphaned account {account_id} for {}: {ce:#}", row.email);
            msg.push_str(&format!(" (orphaned account {account_id} not removed: {ce:#})"));
        }
        return Err(msg);
    }

    Ok(())
}

/// Process `rows` strictly in order, one at a time. Row failures are recorded
/// and never stop the run; only failing to load the rank list aborts it.
/// `on_progress` sees the tally after every row.
pub async fn run_import<F>(
    backend: &dyn MemberBackend,
    notifier: Option<&dyn Notifier>,
    rows: &[ImportRow],
    batch_id: Uuid,
    opts: &ImportOptions,
    mut on_progress: F,
) -> anyhow::Result<ImportReport>
where
    F: FnMut(&ImportReport),
{
    let ranks = backend.list_ranks().await?;
    let total = rows.len();
    let mut report = ImportReport::new(batch_id, total);

    log::info!("import {batch_id}: {total} rows");

    for (i, row) in rows.iter().enumerate() {
        if row.email.is_empty() {
            report.skipped += 1;
        } else {
            match import_row(backend, &ranks, row, batch_id, opts).await {
                Ok(()) => {
                    report.succeeded += 1;
                    if let Some(n) = notifier {
                        let msg = credential_notice(
                            &row.email,
                            &row.full_name,
                            &opts.default_password,
                            &opts.portal_url,
                        );
                        if let Err(e) = n.send(&msg).await {
                            log::warn!("notice to {} failed: {e:#}", row.email);
                        }
                    }
                }
                Err(error) => {
                    log::warn!("import {batch_id}: line {} ({}) failed: {error}", row.line, row.email);
                    report.failures.push(RowFailure {
                        email: row.email.clone(),
                        error,
                    });
                }
            }
        }

        report.processed = i + 1;
        report.percent = ((i + 1) as f64 / total as f64 * 100.0).round() as u8;
        on_progress(&report);
    }

    log::info!(
        "import {batch_id} complete: {} succeeded, {} failed, {} skipped",
        report.succeeded,
        report.failed(),
        report.skipped
    );
    Ok(report)
}
