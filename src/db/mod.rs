pub mod account_repo;
pub mod event_repo;
pub mod hof_repo;
pub mod models;
pub mod player_repo;
pub mod rank_repo;
