use anyhow::{Context, Result};
use sqlx::PgPool;

use uuid::Uuid;

use crate::db::models::{Event, EventPlayer, EventSummary, EventThreshold, LeaderboardEntry};

/// Events newest first, each with its threshold columns (if linked).
pub async fn list_events(db: &PgPool) -> Result<Vec<EventSummary>> {
    sqlx::query_as::<_, EventSummary>(
        r#"
        SELECT e.id, e.name, e.event_date, e.event_threshold_id,
               t.min_participation, t.min_score, t.season, t.description
          FROM events e
          LEFT JOIN event_thresholds t ON t.id = e.event_threshold_id
         ORDER BY e.event_date DESC
        "#,
    )
    .fetch_all(db)
    .await
    .context("listing events")
}

pub async fn get_event(db: &PgPool, id: Uuid) -> Result<Option<Event>> {
    sqlx::query_as::<_, Event>(
        "SELECT id, name, event_date, event_threshold_id FROM events WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("fetching event")
}

pub async fn list_thresholds(db: &PgPool) -> Result<Vec<EventThreshold>> {
    sqlx::query_as::<_, EventThreshold>(
        r#"
        SELECT id, event_name, min_participation, min_score, season, description
          FROM event_thresholds
         ORDER BY event_name
        "#,
    )
    .fetch_all(db)
    .await
    .context("listing event thresholds")
}

pub async fn get_threshold(db: &PgPool, id: Uuid) -> Result<Option<EventThreshold>> {
    sqlx::query_as::<_, EventThreshold>(
        r#"
        SELECT id, event_name, min_participation, min_score, season, description
          FROM event_thresholds
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("fetching event threshold")
}

/// Participation rows for one event, best rating first.
pub async fn event_players(db: &PgPool, event_id: Uuid) -> Result<Vec<EventPlayer>> {
    sqlx::query_as::<_, EventPlayer>(
        r#"
        SELECT id, event_id, player_id, participation_choice,
               battle_rating, kills, deaths, created_at
          FROM event_players
         WHERE event_id = $1
         ORDER BY battle_rating DESC, created_at
        "#,
    )
    .bind(event_id)
    .fetch_all(db)
    .await
    .context("listing event participants")
}

/// Top participation rows by battle rating.
pub async fn leaderboard(db: &PgPool, limit: i64) -> Result<Vec<LeaderboardEntry>> {
    sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT ep.player_id, p.full_name, p.role, p.troop_type,
               e.name AS event_name, ep.battle_rating, ep.kills, ep.deaths
          FROM event_players ep
          JOIN players p ON p.id = ep.player_id
          JOIN events  e ON e.id = ep.event_id
         ORDER BY ep.battle_rating DESC, ep.created_at
         LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
    .context("loading leaderboard")
}
