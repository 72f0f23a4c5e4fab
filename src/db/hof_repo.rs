use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::db::models::{Achievement, HallOfFameEntry};

/// Most recently awarded first.
pub async fn list_achievements(db: &PgPool) -> Result<Vec<Achievement>> {
    sqlx::query_as::<_, Achievement>(
        "SELECT id, title, description, icon, date_awarded FROM achievements \
         ORDER BY date_awarded DESC, title",
    )
    .fetch_all(db)
    .await
    .context("listing achievements")
}

/// Latest inductees first; members without a year go last.
pub async fn list_inductees(db: &PgPool) -> Result<Vec<HallOfFameEntry>> {
    sqlx::query_as::<_, HallOfFameEntry>(
        "SELECT id, full_name, title, avatar_url, inducted_year FROM hof \
         ORDER BY inducted_year DESC NULLS LAST, full_name",
    )
    .fetch_all(db)
    .await
    .context("listing hall of fame")
}
