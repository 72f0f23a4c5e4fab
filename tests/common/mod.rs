//! In-memory doubles for the member store and the mail relay.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use alliance_portal::backend::MemberBackend;
use alliance_portal::db::models::{
    Achievement, Event, EventPlayer, EventSummary, EventThreshold, HallOfFameEntry,
    LeaderboardEntry, NewPlayer, Player, Rank,
};
use alliance_portal::notify::{EmailMessage, Notifier};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FakeAccount {
    pub id: Uuid,
    pub email: String,
    pub password: String,
}

#[derive(Default)]
struct Store {
    accounts: Vec<FakeAccount>,
    players: Vec<Player>,
    ranks: Vec<Rank>,
    account_attempts: usize,
    events: Vec<Event>,
    thresholds: Vec<EventThreshold>,
    participants: Vec<EventPlayer>,
    achievements: Vec<Achievement>,
    inductees: Vec<HallOfFameEntry>,
}

#[derive(Default)]
pub struct FakeBackend {
    store: Mutex<Store>,
    /// Emails whose profile insert is rejected.
    reject_insert: Mutex<HashSet<String>>,
    fail_ranks: Mutex<bool>,
    fail_account_delete: Mutex<bool>,
    /// Wait before every account creation.
    account_delay: Mutex<Option<Duration>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ranks(ranks: &[(&str, i64)]) -> Self {
        let backend = Self::default();
        backend.store.lock().unwrap().ranks = ranks
            .iter()
            .map(|(name, min_might)| Rank {
                id: Uuid::new_v4(),
                name: name.to_string(),
                min_might: *min_might,
            })
            .collect();
        backend
    }

    pub fn rank_id(&self, name: &str) -> Uuid {
        self.store
            .lock()
            .unwrap()
            .ranks
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.id)
            .expect("rank exists")
    }

    pub fn reject_insert_for(&self, email: &str) {
        self.reject_insert.lock().unwrap().insert(email.to_string());
    }

    pub fn fail_rank_listing(&self) {
        *self.fail_ranks.lock().unwrap() = true;
    }

    pub fn fail_account_delete(&self) {
        *self.fail_account_delete.lock().unwrap() = true;
    }

    pub fn slow_accounts(&self, delay: Duration) {
        *self.account_delay.lock().unwrap() = Some(delay);
    }

    /// One event with a threshold and a participation row per rating.
    pub fn seed_event(&self, name: &str, ratings: &[(Uuid, i64)]) -> Uuid {
        let mut store = self.store.lock().unwrap();
        let threshold = EventThreshold {
            id: Uuid::new_v4(),
            event_name: name.to_string(),
            min_participation: 1,
            min_score: 100,
            season: Some("S1".into()),
            description: None,
        };
        let event = Event {
            id: Uuid::new_v4(),
            name: name.to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            event_threshold_id: Some(threshold.id),
        };
        for (player_id, rating) in ratings {
            store.participants.push(EventPlayer {
                id: Uuid::new_v4(),
                event_id: event.id,
                player_id: *player_id,
                participation_choice: true,
                battle_rating: *rating,
                kills: 0,
                deaths: 0,
                created_at: Utc::now(),
            });
        }
        let id = event.id;
        store.thresholds.push(threshold);
        store.events.push(event);
        id
    }

    pub fn seed_achievement(&self, title: &str, awarded: NaiveDate) {
        self.store.lock().unwrap().achievements.push(Achievement {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            icon: None,
            date_awarded: awarded,
        });
    }

    pub fn seed_inductee(&self, full_name: &str, year: Option<i32>) {
        self.store.lock().unwrap().inductees.push(HallOfFameEntry {
            id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            title: None,
            avatar_url: None,
            inducted_year: year,
        });
    }

    pub fn account_attempts(&self) -> usize {
        self.store.lock().unwrap().account_attempts
    }

    pub fn accounts(&self) -> Vec<FakeAccount> {
        self.store.lock().unwrap().accounts.clone()
    }

    pub fn players(&self) -> Vec<Player> {
        self.store.lock().unwrap().players.clone()
    }

    pub fn player_by_email(&self, email: &str) -> Option<Player> {
        self.players().into_iter().find(|p| p.email == email)
    }

    /// Seed an admin with account + profile; returns (account id, player).
    pub fn seed_member(&self, email: &str, password: &str, role: &str) -> (Uuid, Player) {
        let mut store = self.store.lock().unwrap();
        let account_id = Uuid::new_v4();
        store.accounts.push(FakeAccount {
            id: account_id,
            email: email.to_string(),
            password: password.to_string(),
        });
        let player = player_row(&NewPlayer {
            auth_id: Some(account_id),
            full_name: email.to_string(),
            email: email.to_string(),
            country: String::new(),
            troop_type: String::new(),
            igg_id: None,
            discord_id: None,
            might: 0,
            rank_id: None,
            role: alliance_portal::db::models::Role::parse(role),
            batch_id: None,
        });
        store.players.push(player.clone());
        (account_id, player)
    }
}

pub fn player_row(p: &NewPlayer) -> Player {
    Player {
        id: Uuid::new_v4(),
        auth_id: p.auth_id,
        full_name: p.full_name.clone(),
        email: p.email.clone(),
        country: p.country.clone(),
        discord_id: p.discord_id.clone(),
        igg_id: p.igg_id.clone(),
        troop_type: p.troop_type.clone(),
        troop_specialist: None,
        hero_name: None,
        bio: None,
        farm_account: false,
        might: p.might,
        rank_id: p.rank_id,
        role: p.role.as_str().to_string(),
        batch_id: p.batch_id,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl MemberBackend for FakeBackend {
    async fn list_ranks(&self) -> Result<Vec<Rank>> {
        if *self.fail_ranks.lock().unwrap() {
            bail!("rank table unavailable");
        }
        Ok(self.store.lock().unwrap().ranks.clone())
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Uuid> {
        let delay = *self.account_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut store = self.store.lock().unwrap();
        store.account_attempts += 1;
        if store
            .accounts
            .iter()
            .any(|a| a.email.eq_ignore_ascii_case(email))
        {
            bail!("account already exists for {email}");
        }
        let id = Uuid::new_v4();
        store.accounts.push(FakeAccount {
            id,
            email: email.to_string(),
            password: password.to_string(),
        });
        Ok(id)
    }

    async fn delete_account(&self, account_id: Uuid) -> Result<()> {
        if *self.fail_account_delete.lock().unwrap() {
            bail!("identity service unavailable");
        }
        self.store
            .lock()
            .unwrap()
            .accounts
            .retain(|a| a.id != account_id);
        Ok(())
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<Uuid>> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email) && a.password == password)
            .map(|a| a.id))
    }

    async fn insert_player(&self, player: &NewPlayer) -> Result<Uuid> {
        if self.reject_insert.lock().unwrap().contains(&player.email) {
            return Err(anyhow!("profile insert rejected for {}", player.email));
        }
        let row = player_row(player);
        let id = row.id;
        self.store.lock().unwrap().players.push(row);
        Ok(id)
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        Ok(self.players())
    }

    async fn get_player(&self, id: Uuid) -> Result<Option<Player>> {
        Ok(self.players().into_iter().find(|p| p.id == id))
    }

    async fn find_player_by_email(&self, email: &str) -> Result<Option<Player>> {
        Ok(self
            .players()
            .into_iter()
            .find(|p| p.email.eq_ignore_ascii_case(email)))
    }

    async fn delete_batch(&self, batch_id: Uuid) -> Result<u64> {
        let mut store = self.store.lock().unwrap();
        let removed: Vec<Player> = store
            .players
            .iter()
            .filter(|p| p.batch_id == Some(batch_id))
            .cloned()
            .collect();
        store.players.retain(|p| p.batch_id != Some(batch_id));
        let account_ids: HashSet<Uuid> = removed.iter().filter_map(|p| p.auth_id).collect();
        store.accounts.retain(|a| !account_ids.contains(&a.id));
        Ok(removed.len() as u64)
    }

    async fn list_events(&self) -> Result<Vec<EventSummary>> {
        Ok(Vec::new())
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn list_thresholds(&self) -> Result<Vec<EventThreshold>> {
        Ok(self.store.lock().unwrap().thresholds.clone())
    }

    async fn get_threshold(&self, id: Uuid) -> Result<Option<EventThreshold>> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .thresholds
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn event_players(&self, event_id: Uuid) -> Result<Vec<EventPlayer>> {
        let mut rows: Vec<EventPlayer> = self
            .store
            .lock()
            .unwrap()
            .participants
            .iter()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.battle_rating.cmp(&a.battle_rating));
        Ok(rows)
    }

    async fn leaderboard(&self, _limit: i64) -> Result<Vec<LeaderboardEntry>> {
        Ok(Vec::new())
    }

    async fn list_achievements(&self) -> Result<Vec<Achievement>> {
        let mut rows = self.store.lock().unwrap().achievements.clone();
        rows.sort_by(|a, b| b.date_awarded.cmp(&a.date_awarded));
        Ok(rows)
    }

    async fn hall_of_fame(&self) -> Result<Vec<HallOfFameEntry>> {
        let mut rows = self.store.lock().unwrap().inductees.clone();
        // newest year first, unknown years last
        rows.sort_by(|a, b| match (a.inducted_year, b.inducted_year) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(rows)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Keeps every message; optionally fails each send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, msg: &EmailMessage) -> Result<()> {
        self.sent.lock().unwrap().push(msg.clone());
        if self.fail {
            bail!("relay down");
        }
        Ok(())
    }
}
