use axum::{extract::State, Extension, Json};

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::user_settings::{UpsertSettingsRequest, UserSettings};
use crate::store::user_settings;
use crate::AppState;

pub async fn get_settings(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserSettings>> {
    let settings = user_settings::get(&state.db, auth_user.id).await?;
    Ok(Json(settings))
}

pub async fn put_settings(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpsertSettingsRequest>,
) -> AppResult<Json<UserSettings>> {
    let settings = user_settings::upsert(&state.db, auth_user.id, &body).await?;
    Ok(Json(settings))
}
