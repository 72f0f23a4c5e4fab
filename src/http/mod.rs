pub mod auth;
pub mod error;
pub mod health;
pub mod import;
pub mod leaderboard;
pub mod players;
pub mod routes;
