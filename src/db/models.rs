use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Access level stored as text on `players.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    /// Anything other than `admin` is treated as a standard member.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Member
        }
    }
}

#[derive(Debug, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Rank {
    pub id: Uuid,
    pub name: String,
    pub min_might: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Player {
    pub id: Uuid,
    pub auth_id: Option<Uuid>,
    pub full_name: String,
    pub email: String,
    pub country: String,
    pub discord_id: Option<String>,
    pub igg_id: Option<String>,
    pub troop_type: String,
    pub troop_specialist: Option<String>,
    pub hero_name: Option<String>,
    pub bio: Option<String>,
    pub farm_account: bool,
    pub might: i64,
    pub rank_id: Option<Uuid>,
    pub role: String,
    pub batch_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn role(&self) -> Role {
        Role::parse(&self.role)
    }
}

/// Insert payload for `players`; everything else takes column defaults.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub auth_id: Option<Uuid>,
    pub full_name: String,
    pub email: String,
    pub country: String,
    pub troop_type: String,
    pub igg_id: Option<String>,
    pub discord_id: Option<String>,
    pub might: i64,
    pub rank_id: Option<Uuid>,
    pub role: Role,
    pub batch_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct EventThreshold {
    pub id: Uuid,
    pub event_name: String,
    pub min_participation: i32,
    pub min_score: i64,
    pub season: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub event_date: NaiveDate,
    pub event_threshold_id: Option<Uuid>,
}

/// A player's participation record for one event.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventPlayer {
    pub id: Uuid,
    pub event_id: Uuid,
    pub player_id: Uuid,
    pub participation_choice: bool,
    pub battle_rating: i64,
    pub kills: i64,
    pub deaths: i64,
    pub created_at: DateTime<Utc>,
}

/// One event with its threshold and everyone who took part.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    pub event: Event,
    pub threshold: Option<EventThreshold>,
    pub participants: Vec<EventPlayer>,
}

/// An event joined with its qualifying threshold.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventSummary {
    pub id: Uuid,
    pub name: String,
    pub event_date: NaiveDate,
    pub event_threshold_id: Option<Uuid>,
    pub min_participation: Option<i32>,
    pub min_score: Option<i64>,
    pub season: Option<String>,
    pub description: Option<String>,
}

/// One participation row on the Hall-of-Fame leaderboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LeaderboardEntry {
    pub player_id: Uuid,
    pub full_name: String,
    pub role: String,
    pub troop_type: String,
    pub event_name: String,
    pub battle_rating: i64,
    pub kills: i64,
    pub deaths: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Achievement {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Icon name; the page falls back to a trophy.
    pub icon: Option<String>,
    pub date_awarded: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct HallOfFameEntry {
    pub id: Uuid,
    pub full_name: String,
    pub title: Option<String>,
    pub avatar_url: Option<String>,
    pub inducted_year: Option<i32>,
}
