//! Roster view: filter, sort and page an already-fetched player list.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    FullName,
    Email,
    Country,
    TroopType,
    Might,
    CreatedAt,
    /// Any unrecognised name; sorts nothing.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

fn default_page() -> usize {
    1
}
fn default_per_page() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterQuery {
    /// Substring of name or email, case-insensitive.
    #[serde(default)]
    pub search: String,
    pub troop: Option<String>,
    pub farm: Option<bool>,
    pub rank: Option<Uuid>,
    pub sort: Option<SortField>,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

impl Default for RosterQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            troop: None,
            farm: None,
            rank: None,
            sort: None,
            order: SortOrder::Asc,
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

fn matches(p: &Player, q: &RosterQuery, needle: &str) -> bool {
    let search_ok = needle.is_empty()
        || p.full_name.to_lowercase().contains(needle)
        || p.email.to_lowercase().contains(needle);
    let troop_ok = match q.troop.as_deref() {
        None | Some("") | Some("all") => true,
        Some(t) => p.troop_type == t,
    };
    let farm_ok = q.farm.map_or(true, |f| p.farm_account == f);
    let rank_ok = q.rank.map_or(true, |r| p.rank_id == Some(r));

    search_ok && troop_ok && farm_ok && rank_ok
}

fn compare(a: &Player, b: &Player, field: SortField) -> Ordering {
    match field {
        SortField::FullName => a.full_name.to_lowercase().cmp(&b.full_name.to_lowercase()),
        SortField::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        SortField::Country => a.country.to_lowercase().cmp(&b.country.to_lowercase()),
        SortField::TroopType => a.troop_type.to_lowercase().cmp(&b.troop_type.to_lowercase()),
        SortField::Might => a.might.cmp(&b.might),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Unknown => Ordering::Equal,
    }
}

/// Linear filter, stable sort on the chosen field, then a 1-based page slice.
/// Without a known sort field the fetched order is kept.
pub fn apply(players: Vec<Player>, q: &RosterQuery) -> Page<Player> {
    let needle = q.search.trim().to_lowercase();
    let mut rows: Vec<Player> = players.into_iter().filter(|p| matches(p, q, &needle)).collect();

    if let Some(field) = q.sort.filter(|f| *f != SortField::Unknown) {
        rows.sort_by(|a, b| match q.order {
            SortOrder::Asc => compare(a, b, field),
            SortOrder::Desc => compare(b, a, field),
        });
    }

    let per_page = q.per_page.clamp(1, 100);
    let page = q.page.max(1);
    let total = rows.len();
    let total_pages = total.div_ceil(per_page);

    let items = rows
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
    }
}
