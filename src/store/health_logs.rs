//! Day-keyed record store. Every operation takes the owning user id as a
//! mandatory filter; rows belonging to other users are invisible here.
//! Concurrent upserts to the same (user, date) race at the storage layer
//! and the last writer wins.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::health_log::{HealthLog, HealthLogPatch, NewHealthLog};

pub async fn get(db: &PgPool, user_id: Uuid, date: NaiveDate) -> AppResult<Option<HealthLog>> {
    let log = sqlx::query_as::<_, HealthLog>(
        "SELECT * FROM health_logs WHERE user_id = $1 AND log_date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(db)
    .await?;

    Ok(log)
}

/// Ascending by date; an empty range is a valid, non-error result.
pub async fn get_range(
    db: &PgPool,
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<HealthLog>> {
    if start > end {
        return Err(AppError::Validation(
            "start_date must not be after end_date".into(),
        ));
    }

    let logs = sqlx::query_as::<_, HealthLog>(
        r#"
        SELECT * FROM health_logs
        WHERE user_id = $1 AND log_date BETWEEN $2 AND $3
        ORDER BY log_date ASC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await?;

    Ok(logs)
}

/// Full replace on (user, date) conflict: every recognized field is set from
/// the new snapshot, so optionals omitted from the payload reset to null.
pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
    new: &NewHealthLog,
) -> AppResult<HealthLog> {
    let log = sqlx::query_as::<_, HealthLog>(
        r#"
        INSERT INTO health_logs (
            id, user_id, log_date,
            general_mood, pain_level, meal_description, stool_type,
            alcohol_amount, alcohol_percent, alcohol_type, alcohol_reason,
            medication_taken, stress_level, sleep_quality, spending,
            weight, body_fat, calories, protein, steps, exercise_minutes,
            period_status, memo, ai_comment
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)
        ON CONFLICT (user_id, log_date) DO UPDATE SET
            general_mood = EXCLUDED.general_mood,
            pain_level = EXCLUDED.pain_level,
            meal_description = EXCLUDED.meal_description,
            stool_type = EXCLUDED.stool_type,
            alcohol_amount = EXCLUDED.alcohol_amount,
            alcohol_percent = EXCLUDED.alcohol_percent,
            alcohol_type = EXCLUDED.alcohol_type,
            alcohol_reason = EXCLUDED.alcohol_reason,
            medication_taken = EXCLUDED.medication_taken,
            stress_level = EXCLUDED.stress_level,
            sleep_quality = EXCLUDED.sleep_quality,
            spending = EXCLUDED.spending,
            weight = EXCLUDED.weight,
            body_fat = EXCLUDED.body_fat,
            calories = EXCLUDED.calories,
            protein = EXCLUDED.protein,
            steps = EXCLUDED.steps,
            exercise_minutes = EXCLUDED.exercise_minutes,
            period_status = EXCLUDED.period_status,
            memo = EXCLUDED.memo,
            ai_comment = EXCLUDED.ai_comment,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(date)
    .bind(new.general_mood)
    .bind(new.pain_level)
    .bind(&new.meal_description)
    .bind(new.stool_type)
    .bind(new.alcohol_amount)
    .bind(new.alcohol_percent)
    .bind(&new.alcohol_type)
    .bind(&new.alcohol_reason)
    .bind(new.medication_taken)
    .bind(new.stress_level)
    .bind(&new.sleep_quality)
    .bind(new.spending)
    .bind(new.weight)
    .bind(new.body_fat)
    .bind(new.calories)
    .bind(new.protein)
    .bind(new.steps)
    .bind(new.exercise_minutes)
    .bind(new.period_status)
    .bind(&new.memo)
    .bind(&new.ai_comment)
    .fetch_one(db)
    .await?;

    Ok(log)
}

/// Allow-listed partial update. The ownership check runs before any
/// mutation; a row owned by another user surfaces as NotFound.
pub async fn patch(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    patch: &HealthLogPatch,
) -> AppResult<HealthLog> {
    let exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM health_logs WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_one(db)
    .await?;

    if exists == 0 {
        return Err(AppError::NotFound("Health log not found".into()));
    }

    let log = sqlx::query_as::<_, HealthLog>(
        r#"
        UPDATE health_logs SET
            memo = COALESCE($3, memo),
            general_mood = COALESCE($4, general_mood),
            meal_description = COALESCE($5, meal_description),
            pain_level = COALESCE($6, pain_level),
            stool_type = COALESCE($7, stool_type),
            weight = CASE WHEN $8 THEN $9 ELSE weight END,
            steps = CASE WHEN $10 THEN $11 ELSE steps END,
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&patch.memo)
    .bind(patch.general_mood)
    .bind(&patch.meal_description)
    .bind(patch.pain_level)
    .bind(patch.stool_type)
    .bind(patch.weight.is_some())
    .bind(patch.weight.flatten())
    .bind(patch.steps.is_some())
    .bind(patch.steps.flatten())
    .fetch_one(db)
    .await?;

    Ok(log)
}

#[derive(Debug, Clone, Copy)]
pub enum DeleteSelector {
    Id(Uuid),
    Date(NaiveDate),
}

pub async fn delete(db: &PgPool, user_id: Uuid, selector: DeleteSelector) -> AppResult<()> {
    let result = match selector {
        DeleteSelector::Id(id) => {
            sqlx::query("DELETE FROM health_logs WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(db)
                .await?
        }
        DeleteSelector::Date(date) => {
            sqlx::query("DELETE FROM health_logs WHERE user_id = $1 AND log_date = $2")
                .bind(user_id)
                .bind(date)
                .execute(db)
                .await?
        }
    };

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Health log not found".into()));
    }

    Ok(())
}

/// Cache the generated commentary on the day's record.
pub async fn set_ai_comment(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    comment: &str,
) -> AppResult<()> {
    sqlx::query(
        "UPDATE health_logs SET ai_comment = $3, updated_at = NOW() WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .bind(comment)
    .execute(db)
    .await?;

    Ok(())
}
