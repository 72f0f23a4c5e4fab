//! Rank lookups over an already-fetched rank list.

use crate::db::models::Rank;

/// Case-insensitive exact name match.
pub fn find_by_name<'a>(ranks: &'a [Rank], name: &str) -> Option<&'a Rank> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    ranks.iter().find(|r| r.name.to_lowercase() == wanted)
}

/// Highest rank whose `min_might` the given might reaches.
pub fn classify(ranks: &[Rank], might: i64) -> Option<&Rank> {
    ranks
        .iter()
        .filter(|r| r.min_might <= might)
        .max_by_key(|r| r.min_might)
}
