//! Bulk member import: template, preview, start, progress, failures, rollback.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::http::auth::AdminAuth;
use crate::http::error::ApiError;
use crate::import::{self, csv, runner, ImportError};
use crate::state::AppState;

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

fn csv_download(filename: &str, body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(CSV_CONTENT_TYPE)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body)
}

/// GET /api/import/template
#[get("/import/template")]
pub async fn template() -> HttpResponse {
    csv_download("alliance_bulk_template.csv", csv::template())
}

/// POST /api/import/preview   (body: CSV text)
#[post("/import/preview")]
pub async fn preview(_admin: AdminAuth, body: String) -> HttpResponse {
    HttpResponse::Ok().json(import::rows_from_csv(&body))
}

/// POST /api/import   (body: CSV text)
///
/// Starts the run in the background and answers 202 with its batch id.
#[post("/import")]
pub async fn start(
    admin: AdminAuth,
    body: String,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let rows = import::rows_from_csv(&body);
    if rows.is_empty() {
        return Err(ImportError::Empty.into());
    }

    let batch_id = Uuid::new_v4();
    let total_rows = rows.len();
    state.runs.start(batch_id, total_rows);
    log::info!(
        "player {} started import {batch_id} ({total_rows} rows)",
        admin.0.player_id
    );

    let state = state.into_inner();
    actix_web::rt::spawn(async move {
        let runs = state.runs.clone();
        let result = runner::run_import(
            state.backend.as_ref(),
            state.notifier.as_deref(),
            &rows,
            batch_id,
            &state.import,
            |report| runs.update(report),
        )
        .await;

        match result {
            Ok(report) => state.runs.finish(report),
            Err(e) => {
                log::error!("import {batch_id} aborted: {e:#}");
                state.runs.abort(batch_id, format!("{e:#}"));
            }
        }
    });

    Ok(HttpResponse::Accepted().json(json!({ "batch_id": batch_id, "total_rows": total_rows })))
}

/// GET /api/import/runs/{batch_id}
#[get("/import/runs/{batch_id}")]
pub async fn status(
    _admin: AdminAuth,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let batch_id = path.into_inner();
    let run = state
        .runs
        .get(batch_id)
        .ok_or(ImportError::UnknownRun(batch_id))?;
    Ok(HttpResponse::Ok().json(run))
}

/// GET /api/import/runs/{batch_id}/failures.csv
#[get("/import/runs/{batch_id}/failures.csv")]
pub async fn failures(
    _admin: AdminAuth,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let batch_id = path.into_inner();
    let run = state
        .runs
        .get(batch_id)
        .ok_or(ImportError::UnknownRun(batch_id))?;
    Ok(csv_download(
        "alliance_failed_registrations.csv",
        csv::failures_csv(&run.report.failures),
    ))
}

#[derive(Deserialize)]
pub struct RollbackParams {
    #[serde(default)]
    pub confirm: bool,
}

/// DELETE /api/import/runs/{batch_id}?confirm=true
///
/// 409 while the run is still going.
#[delete("/import/runs/{batch_id}")]
pub async fn rollback(
    admin: AdminAuth,
    path: web::Path<Uuid>,
    web::Query(params): web::Query<RollbackParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let batch_id = path.into_inner();
    state.runs.ensure_settled(batch_id)?;
    let deleted = import::rollback(state.backend.as_ref(), batch_id, params.confirm).await?;
    state.runs.remove(batch_id);
    log::info!("player {} rolled back import {batch_id}", admin.0.player_id);
    Ok(HttpResponse::Ok().json(json!({ "batch_id": batch_id, "deleted": deleted })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(template)
        .service(preview)
        .service(start)
        .service(status)
        .service(failures)
        .service(rollback);
}
