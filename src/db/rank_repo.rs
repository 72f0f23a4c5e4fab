use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::db::models::Rank;

/// Ranks ordered by threshold, lowest first.
pub async fn list_ranks(db: &PgPool) -> Result<Vec<Rank>> {
    sqlx::query_as::<_, Rank>("SELECT id, name, min_might FROM ranks ORDER BY min_might")
        .fetch_all(db)
        .await
        .context("listing ranks")
}
