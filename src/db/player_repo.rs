use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{NewPlayer, Player};

const PLAYER_COLUMNS: &str = r#"
    id, auth_id, full_name, email, country, discord_id, igg_id, troop_type,
    troop_specialist, hero_name, bio, farm_account, might, rank_id, role,
    batch_id, created_at
"#;

pub async fn insert_player(db: &PgPool, p: &NewPlayer) -> Result<Uuid> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO players (auth_id, full_name, email, country, troop_type,
                             igg_id, discord_id, might, rank_id, role, batch_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id
        "#,
    )
    .bind(p.auth_id)
    .bind(&p.full_name)
    .bind(&p.email)
    .bind(&p.country)
    .bind(&p.troop_type)
    .bind(&p.igg_id)
    .bind(&p.discord_id)
    .bind(p.might)
    .bind(p.rank_id)
    .bind(p.role.as_str())
    .bind(p.batch_id)
    .fetch_one(db)
    .await
    .with_context(|| format!("inserting player {}", p.email))
}

/// Newest first, the roster's default order.
pub async fn list_players(db: &PgPool) -> Result<Vec<Player>> {
    sqlx::query_as::<_, Player>(&format!(
        "SELECT {PLAYER_COLUMNS} FROM players ORDER BY created_at DESC"
    ))
    .fetch_all(db)
    .await
    .context("listing players")
}

pub async fn get_player(db: &PgPool, id: Uuid) -> Result<Option<Player>> {
    sqlx::query_as::<_, Player>(&format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("fetching player")
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<Player>> {
    sqlx::query_as::<_, Player>(&format!(
        "SELECT {PLAYER_COLUMNS} FROM players WHERE lower(email) = lower($1) \
         ORDER BY created_at LIMIT 1"
    ))
    .bind(email)
    .fetch_optional(db)
    .await
    .context("fetching player by email")
}

/// Delete every player tagged with `batch_id` together with the accounts
/// they were created with (transactional). Returns the player rows removed.
pub async fn delete_batch(db: &PgPool, batch_id: Uuid) -> Result<u64> {
    let mut tx = db.begin().await?;

    let auth_ids =
        sqlx::query_scalar::<_, Option<Uuid>>("DELETE FROM players WHERE batch_id = $1 RETURNING auth_id")
            .bind(batch_id)
            .fetch_all(&mut *tx)
            .await
            .context("deleting batch players")?;

    let accounts: Vec<Uuid> = auth_ids.iter().flatten().copied().collect();
    if !accounts.is_empty() {
        sqlx::query("DELETE FROM accounts WHERE id = ANY($1)")
            .bind(&accounts)
            .execute(&mut *tx)
            .await
            .context("deleting batch accounts")?;
    }

    tx.commit().await?;
    Ok(auth_ids.len() as u64)
}
