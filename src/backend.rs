//! The data boundary every handler and the import runner talk to.
//!
//! Privileged work (account creation, batch deletion) happens only behind this
//! trait on the server; callers never hold database or service credentials.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{
    Achievement, Event, EventPlayer, EventSummary, EventThreshold, HallOfFameEntry,
    LeaderboardEntry, NewPlayer, Player, Rank,
};
use crate::db::{account_repo, event_repo, hof_repo, player_repo, rank_repo};

#[async_trait]
pub trait MemberBackend: Send + Sync {
    async fn list_ranks(&self) -> Result<Vec<Rank>>;

    /// Create an identity account and return its id.
    async fn create_account(&self, email: &str, password: &str) -> Result<Uuid>;
    async fn delete_account(&self, account_id: Uuid) -> Result<()>;
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<Uuid>>;

    async fn insert_player(&self, player: &NewPlayer) -> Result<Uuid>;
    async fn list_players(&self) -> Result<Vec<Player>>;
    async fn get_player(&self, id: Uuid) -> Result<Option<Player>>;
    async fn find_player_by_email(&self, email: &str) -> Result<Option<Player>>;

    /// Remove every player (and its account) tagged with `batch_id`.
    async fn delete_batch(&self, batch_id: Uuid) -> Result<u64>;

    async fn list_events(&self) -> Result<Vec<EventSummary>>;
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>>;
    async fn list_thresholds(&self) -> Result<Vec<EventThreshold>>;
    async fn get_threshold(&self, id: Uuid) -> Result<Option<EventThreshold>>;
    async fn event_players(&self, event_id: Uuid) -> Result<Vec<EventPlayer>>;

    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>>;
    async fn list_achievements(&self) -> Result<Vec<Achievement>>;
    async fn hall_of_fame(&self) -> Result<Vec<HallOfFameEntry>>;

    async fn ping(&self) -> Result<()>;
}

/// Postgres-backed implementation.
#[derive(Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberBackend for PgBackend {
    async fn list_ranks(&self) -> Result<Vec<Rank>> {
        rank_repo::list_ranks(&self.pool).await
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Uuid> {
        account_repo::create_account(&self.pool, email, password).await
    }

    async fn delete_account(&self, account_id: Uuid) -> Result<()> {
        account_repo::delete_account(&self.pool, account_id).await
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<Uuid>> {
        account_repo::verify_credentials(&self.pool, email, password).await
    }

    async fn insert_player(&self, player: &NewPlayer) -> Result<Uuid> {
        player_repo::insert_player(&self.pool, player).await
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        player_repo::list_players(&self.pool).await
    }

    async fn get_player(&self, id: Uuid) -> Result<Option<Player>> {
        player_repo::get_player(&self.pool, id).await
    }

    async fn find_player_by_email(&self, email: &str) -> Result<Option<Player>> {
        player_repo::find_by_email(&self.pool, email).await
    }

    async fn delete_batch(&self, batch_id: Uuid) -> Result<u64> {
        player_repo::delete_batch(&self.pool, batch_id).await
    }

    async fn list_events(&self) -> Result<Vec<EventSummary>> {
        event_repo::list_events(&self.pool).await
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        event_repo::get_event(&self.pool, id).await
    }

    async fn list_thresholds(&self) -> Result<Vec<EventThreshold>> {
        event_repo::list_thresholds(&self.pool).await
    }

    async fn get_threshold(&self, id: Uuid) -> Result<Option<EventThreshold>> {
        event_repo::get_threshold(&self.pool, id).await
    }

    async fn event_players(&self, event_id: Uuid) -> Result<Vec<EventPlayer>> {
        event_repo::event_players(&self.pool, event_id).await
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        event_repo::leaderboard(&self.pool, limit).await
    }

    async fn list_achievements(&self) -> Result<Vec<Achievement>> {
        hof_repo::list_achievements(&self.pool).await
    }

    async fn hall_of_fame(&self) -> Result<Vec<HallOfFameEntry>> {
        hof_repo::list_inductees(&self.pool).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
