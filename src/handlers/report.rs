use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::engine::report;
use crate::error::AppResult;
use crate::services::generation;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    pub period: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report: String,
    pub period: u32,
    pub source: String,
}

/// POST /api/report — 7 or 30 day window. An empty window still produces a
/// report request with the explicit no-data context.
pub async fn post_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ReportRequest>,
) -> AppResult<Json<ReportResponse>> {
    let days = report::clamp_window_days(body.period.unwrap_or(7));

    let ctx = report::build(&state.db, auth_user.id, days).await?;

    let (text, source) = match generation::generate(&state.config, &ctx).await {
        Ok(text) => (text, "model"),
        Err(e) => {
            tracing::warn!(error = %e, "Generation service unavailable, using fallback");
            (generation::REPORT_FALLBACK.to_string(), "fallback")
        }
    };

    Ok(Json(ReportResponse {
        report: text,
        period: days,
        source: source.into(),
    }))
}
