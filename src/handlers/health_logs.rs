use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::health_log::{
    DeleteHealthLogQuery, HealthLogQuery, PatchHealthLogRequest, UpsertHealthLogRequest,
};
use crate::store::health_logs::{self, DeleteSelector};
use crate::AppState;

/// GET /api/health-logs?date=… for one day (JSON null when absent), or
/// ?start_date=…&end_date=… for an ascending range.
pub async fn get_health_logs(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<HealthLogQuery>,
) -> AppResult<Json<Value>> {
    if let Some(date) = query.date {
        let log = health_logs::get(&state.db, auth_user.id, date).await?;
        return Ok(Json(json!(log)));
    }

    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        let logs = health_logs::get_range(&state.db, auth_user.id, start, end).await?;
        return Ok(Json(json!(logs)));
    }

    Err(AppError::Validation(
        "date or start_date+end_date required".into(),
    ))
}

pub async fn upsert_health_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpsertHealthLogRequest>,
) -> AppResult<Json<Value>> {
    let (date, new_log) = body.into_new_log()?;
    let log = health_logs::upsert(&state.db, auth_user.id, date, &new_log).await?;
    Ok(Json(json!(log)))
}

pub async fn patch_health_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<PatchHealthLogRequest>,
) -> AppResult<Json<Value>> {
    let patch = body.into_patch()?;
    let log = health_logs::patch(&state.db, id, auth_user.id, &patch).await?;
    Ok(Json(json!(log)))
}

/// DELETE /api/health-logs?id=… or ?date=…
pub async fn delete_health_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DeleteHealthLogQuery>,
) -> AppResult<Json<Value>> {
    let selector = match (query.id, query.date) {
        (Some(id), _) => DeleteSelector::Id(id),
        (None, Some(date)) => DeleteSelector::Date(date),
        (None, None) => {
            return Err(AppError::Validation("id or date required".into()));
        }
    };

    health_logs::delete(&state.db, auth_user.id, selector).await?;
    Ok(Json(json!({ "deleted": true })))
}
