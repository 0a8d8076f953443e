use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::user_settings::{UpsertSettingsRequest, UserSettings};

/// Never fails on absence: a user without a saved row gets the documented
/// default (clinical tracking on, everything else off).
pub async fn get(db: &PgPool, user_id: Uuid) -> AppResult<UserSettings> {
    let row = sqlx::query_as::<_, UserSettings>(
        "SELECT * FROM user_settings WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row.unwrap_or_else(|| UserSettings::default_for(user_id)))
}

/// Full replace of the settings row, created if absent.
pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    req: &UpsertSettingsRequest,
) -> AppResult<UserSettings> {
    let row = sqlx::query_as::<_, UserSettings>(
        r#"
        INSERT INTO user_settings (
            user_id, mode_ibd, mode_alcohol, mode_mental, mode_diet,
            medical_history, current_medications, gender
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id) DO UPDATE SET
            mode_ibd = EXCLUDED.mode_ibd,
            mode_alcohol = EXCLUDED.mode_alcohol,
            mode_mental = EXCLUDED.mode_mental,
            mode_diet = EXCLUDED.mode_diet,
            medical_history = EXCLUDED.medical_history,
            current_medications = EXCLUDED.current_medications,
            gender = EXCLUDED.gender,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(req.mode_ibd)
    .bind(req.mode_alcohol)
    .bind(req.mode_mental)
    .bind(req.mode_diet)
    .bind(&req.medical_history)
    .bind(&req.current_medications)
    .bind(req.gender)
    .fetch_one(db)
    .await?;

    Ok(row)
}
