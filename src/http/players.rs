//! Read-only roster, rank and event listings.

use actix_web::{get, web, HttpResponse};
use uuid::Uuid;

use crate::http::auth::JwtAuth;
use crate::db::models::EventDetail;
use crate::http::error::ApiError;
use crate::roster::{self, RosterQuery};
use crate::state::AppState;

/// GET /api/players?search=&troop=&farm=&rank=&sort=&order=&page=&per_page=
#[get("/players")]
pub async fn list(
    _auth: JwtAuth,
    web::Query(query): web::Query<RosterQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let players = state.backend.list_players().await?;
    Ok(HttpResponse::Ok().json(roster::apply(players, &query)))
}

/// GET /api/ranks
#[get("/ranks")]
pub async fn ranks(_auth: JwtAuth, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.backend.list_ranks().await?))
}

/// GET /api/events
#[get("/events")]
pub async fn events(_auth: JwtAuth, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.backend.list_events().await?))
}

/// GET /api/events/{id}: the event, its threshold and its participants.
#[get("/events/{id}")]
pub async fn event_detail(
    _auth: JwtAuth,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let event = state
        .backend
        .get_event(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no event {id}")))?;

    let threshold = match event.event_threshold_id {
        Some(t) => state.backend.get_threshold(t).await?,
        None => None,
    };
    let participants = state.backend.event_players(id).await?;

    Ok(HttpResponse::Ok().json(EventDetail {
        event,
        threshold,
        participants,
    }))
}

/// GET /api/thresholds
#[get("/thresholds")]
pub async fn thresholds(_auth: JwtAuth, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.backend.list_thresholds().await?))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(ranks)
        .service(events)
        .service(event_detail)
        .service(thresholds);
}
