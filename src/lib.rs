//! Alliance portal server: member roster, bulk CSV registration and the
//! Hall-of-Fame leaderboard over a Postgres-backed member store.

pub mod backend;
pub mod config;
pub mod db;
pub mod http;
pub mod import;
pub mod metrics;
pub mod notify;
pub mod rank;
pub mod roster;
pub mod state;
