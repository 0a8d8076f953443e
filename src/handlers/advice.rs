use axum::{extract::State, Extension, Json};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::engine::classifier::{classify, Tier};
use crate::engine::context::assemble_daily;
use crate::engine::signals::DaySignals;
use crate::error::{AppError, AppResult};
use crate::services::generation;
use crate::store;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AdviceRequest {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub advice: String,
    pub tier: Tier,
    pub commendation: bool,
    pub source: String, // "model" or "fallback"
}

/// POST /api/advice — classify the day's record, hand the assembled context
/// to the generation service, and cache the returned text on the record.
/// A failed generation call degrades to a fallback message, never an error.
pub async fn post_advice(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<AdviceRequest>,
) -> AppResult<Json<AdviceResponse>> {
    let date = body.date.unwrap_or_else(|| Utc::now().date_naive());

    let log = store::health_logs::get(&state.db, auth_user.id, date)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No record for {date}")))?;
    let yesterday_log =
        store::health_logs::get(&state.db, auth_user.id, date - Duration::days(1)).await?;
    let settings = store::user_settings::get(&state.db, auth_user.id).await?;

    let today = DaySignals::from_log(&log);
    let yesterday = yesterday_log.as_ref().map(DaySignals::from_log);
    let classification = classify(&today, yesterday.as_ref(), &settings);
    let ctx = assemble_daily(&today, &classification, &settings);

    let (advice, source) = match generation::generate(&state.config, &ctx).await {
        Ok(text) => {
            store::health_logs::set_ai_comment(&state.db, log.id, auth_user.id, &text).await?;
            (text, "model")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Generation service unavailable, using fallback");
            (generation::DAILY_FALLBACK.to_string(), "fallback")
        }
    };

    Ok(Json(AdviceResponse {
        advice,
        tier: classification.tier,
        commendation: classification.commendation,
        source: source.into(),
    }))
}
