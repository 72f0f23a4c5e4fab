// src/http/leaderboard.rs

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LeaderboardParams {
    /// Maximum number of entries to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 {
    20
}

/// Hall of Fame: best single-event battle ratings.
#[get("/leaderboard")]
pub async fn leaderboard(
    state: web::Data<AppState>,
    web::Query(params): web::Query<LeaderboardParams>,
) -> Result<HttpResponse, ApiError> {
    let rows = state.backend.leaderboard(params.limit.clamp(1, 100)).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/achievements")]
pub async fn achievements(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.backend.list_achievements().await?))
}

/// Inducted alliance legends.
#[get("/hof")]
pub async fn hall_of_fame(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.backend.hall_of_fame().await?))
}

/// Mounts the Hall-of-Fame routes under `/api`
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(leaderboard).service(achievements).service(hall_of_fame);
}
