//! One health log per (user, date). Field names on the wire are the stable
//! snake_case contract (`general_mood`, `pain_level`, `stool_type`, ...);
//! the `log_date` column surfaces as `date` in JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HealthLog {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "log_date")]
    pub date: NaiveDate,
    pub general_mood: Option<i32>,
    pub pain_level: Option<i32>,
    pub meal_description: Option<String>,
    pub stool_type: Option<StoolType>,
    pub alcohol_amount: f64,
    pub alcohol_percent: Option<f64>,
    pub alcohol_type: Option<String>,
    pub alcohol_reason: Option<String>,
    pub medication_taken: Option<bool>,
    pub stress_level: Option<i32>,
    pub sleep_quality: Option<String>,
    pub spending: Option<f64>,
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub calories: Option<i32>,
    pub protein: Option<f64>,
    pub steps: Option<i64>,
    pub exercise_minutes: Option<i32>,
    pub period_status: Option<PeriodStatus>,
    pub memo: Option<String>,
    pub ai_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "stool_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StoolType {
    Normal,
    Loose,
    Diarrhea,
    Hard,
    Bloody,
}

impl StoolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoolType::Normal => "normal",
            StoolType::Loose => "loose",
            StoolType::Diarrhea => "diarrhea",
            StoolType::Hard => "hard",
            StoolType::Bloody => "bloody",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "period_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    None,
    Pre,
    Active,
}

impl PeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodStatus::None => "none",
            PeriodStatus::Pre => "pre-menstrual",
            PeriodStatus::Active => "menstruating",
        }
    }
}

/// A numeric field as clients send it: a JSON number or a numeric string.
/// An empty or whitespace-only string means "no value"; anything else that
/// fails to parse is a validation error, never a silent zero.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Num(f64),
    Str(String),
}

impl NumericField {
    pub fn parse_f64(&self, field: &str) -> AppResult<Option<f64>> {
        match self {
            NumericField::Num(n) if n.is_finite() => Ok(Some(*n)),
            NumericField::Num(_) => Err(AppError::Validation(format!(
                "{field} must be a finite number"
            ))),
            NumericField::Str(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                s.parse::<f64>().map(Some).map_err(|_| {
                    AppError::Validation(format!("{field} must be a number, got {s:?}"))
                })
            }
        }
    }

    pub fn parse_i32(&self, field: &str) -> AppResult<Option<i32>> {
        match self.parse_f64(field)? {
            None => Ok(None),
            Some(v) if v.fract() == 0.0 && (i32::MIN as f64..=i32::MAX as f64).contains(&v) => {
                Ok(Some(v as i32))
            }
            Some(_) => Err(AppError::Validation(format!(
                "{field} must be a whole number"
            ))),
        }
    }

    pub fn parse_i64(&self, field: &str) -> AppResult<Option<i64>> {
        match self.parse_f64(field)? {
            None => Ok(None),
            Some(v) if v.fract() == 0.0 => Ok(Some(v as i64)),
            Some(_) => Err(AppError::Validation(format!(
                "{field} must be a whole number"
            ))),
        }
    }
}

fn parse_opt_f64(v: &Option<NumericField>, field: &str) -> AppResult<Option<f64>> {
    v.as_ref().map_or(Ok(None), |n| n.parse_f64(field))
}

fn parse_opt_i32(v: &Option<NumericField>, field: &str) -> AppResult<Option<i32>> {
    v.as_ref().map_or(Ok(None), |n| n.parse_i32(field))
}

fn parse_opt_i64(v: &Option<NumericField>, field: &str) -> AppResult<Option<i64>> {
    v.as_ref().map_or(Ok(None), |n| n.parse_i64(field))
}

fn check_range(value: Option<i32>, field: &str, min: i32, max: i32) -> AppResult<Option<i32>> {
    if let Some(v) = value {
        if !(min..=max).contains(&v) {
            return Err(AppError::Validation(format!(
                "{field} must be between {min} and {max}"
            )));
        }
    }
    Ok(value)
}

/// POST /api/health-logs — a full snapshot for one day. Unknown fields are
/// ignored; omitted optional fields reset to null on upsert (full replace).
#[derive(Debug, Deserialize)]
pub struct UpsertHealthLogRequest {
    pub date: NaiveDate,
    pub general_mood: Option<NumericField>,
    pub pain_level: Option<NumericField>,
    pub meal_description: Option<String>,
    pub stool_type: Option<StoolType>,
    pub alcohol_amount: Option<NumericField>,
    pub alcohol_percent: Option<NumericField>,
    pub alcohol_type: Option<String>,
    pub alcohol_reason: Option<String>,
    pub medication_taken: Option<bool>,
    pub stress_level: Option<NumericField>,
    pub sleep_quality: Option<String>,
    pub spending: Option<NumericField>,
    pub weight: Option<NumericField>,
    pub body_fat: Option<NumericField>,
    pub calories: Option<NumericField>,
    pub protein: Option<NumericField>,
    pub steps: Option<NumericField>,
    pub exercise_minutes: Option<NumericField>,
    pub period_status: Option<PeriodStatus>,
    pub memo: Option<String>,
    pub ai_comment: Option<String>,
}

/// Fully parsed and validated snapshot, ready for the store.
#[derive(Debug, Clone, Default)]
pub struct NewHealthLog {
    pub general_mood: Option<i32>,
    pub pain_level: Option<i32>,
    pub meal_description: Option<String>,
    pub stool_type: Option<StoolType>,
    pub alcohol_amount: f64,
    pub alcohol_percent: Option<f64>,
    pub alcohol_type: Option<String>,
    pub alcohol_reason: Option<String>,
    pub medication_taken: Option<bool>,
    pub stress_level: Option<i32>,
    pub sleep_quality: Option<String>,
    pub spending: Option<f64>,
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub calories: Option<i32>,
    pub protein: Option<f64>,
    pub steps: Option<i64>,
    pub exercise_minutes: Option<i32>,
    pub period_status: Option<PeriodStatus>,
    pub memo: Option<String>,
    pub ai_comment: Option<String>,
}

impl UpsertHealthLogRequest {
    pub fn into_new_log(self) -> AppResult<(NaiveDate, NewHealthLog)> {
        let general_mood = check_range(
            parse_opt_i32(&self.general_mood, "general_mood")?,
            "general_mood",
            1,
            5,
        )?;
        let pain_level = check_range(
            parse_opt_i32(&self.pain_level, "pain_level")?,
            "pain_level",
            1,
            5,
        )?;
        let stress_level = check_range(
            parse_opt_i32(&self.stress_level, "stress_level")?,
            "stress_level",
            1,
            10,
        )?;

        let alcohol_amount = parse_opt_f64(&self.alcohol_amount, "alcohol_amount")?.unwrap_or(0.0);
        if alcohol_amount < 0.0 {
            return Err(AppError::Validation(
                "alcohol_amount must not be negative".into(),
            ));
        }

        Ok((
            self.date,
            NewHealthLog {
                general_mood,
                pain_level,
                meal_description: self.meal_description,
                stool_type: self.stool_type,
                alcohol_amount,
                alcohol_percent: parse_opt_f64(&self.alcohol_percent, "alcohol_percent")?,
                alcohol_type: self.alcohol_type,
                alcohol_reason: self.alcohol_reason,
                medication_taken: self.medication_taken,
                stress_level,
                sleep_quality: self.sleep_quality,
                spending: parse_opt_f64(&self.spending, "spending")?,
                weight: parse_opt_f64(&self.weight, "weight")?,
                body_fat: parse_opt_f64(&self.body_fat, "body_fat")?,
                calories: parse_opt_i32(&self.calories, "calories")?,
                protein: parse_opt_f64(&self.protein, "protein")?,
                steps: parse_opt_i64(&self.steps, "steps")?,
                exercise_minutes: parse_opt_i32(&self.exercise_minutes, "exercise_minutes")?,
                period_status: self.period_status,
                memo: self.memo,
                ai_comment: self.ai_comment,
            },
        ))
    }
}

/// PATCH /api/health-logs/:id — only this allow-list of fields may change.
/// Anything else in the body is ignored without error. For `weight` and
/// `steps` an empty string clears the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct PatchHealthLogRequest {
    pub memo: Option<String>,
    pub general_mood: Option<NumericField>,
    pub meal_description: Option<String>,
    pub pain_level: Option<NumericField>,
    pub stool_type: Option<StoolType>,
    pub weight: Option<NumericField>,
    pub steps: Option<NumericField>,
}

/// Parsed patch: `None` leaves a field unchanged; the inner `Option` on
/// `weight`/`steps` distinguishes "set" from "clear".
#[derive(Debug, Default, Clone)]
pub struct HealthLogPatch {
    pub memo: Option<String>,
    pub general_mood: Option<i32>,
    pub meal_description: Option<String>,
    pub pain_level: Option<i32>,
    pub stool_type: Option<StoolType>,
    pub weight: Option<Option<f64>>,
    pub steps: Option<Option<i64>>,
}

impl PatchHealthLogRequest {
    pub fn into_patch(self) -> AppResult<HealthLogPatch> {
        let general_mood = check_range(
            parse_opt_i32(&self.general_mood, "general_mood")?,
            "general_mood",
            1,
            5,
        )?;
        let pain_level = check_range(
            parse_opt_i32(&self.pain_level, "pain_level")?,
            "pain_level",
            1,
            5,
        )?;

        Ok(HealthLogPatch {
            memo: self.memo,
            general_mood,
            meal_description: self.meal_description,
            pain_level,
            stool_type: self.stool_type,
            weight: self
                .weight
                .as_ref()
                .map(|n| n.parse_f64("weight"))
                .transpose()?,
            steps: self
                .steps
                .as_ref()
                .map(|n| n.parse_i64("steps"))
                .transpose()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthLogQuery {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteHealthLogQuery {
    pub id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upsert_from(value: serde_json::Value) -> UpsertHealthLogRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numeric_string_is_parsed() {
        let req = upsert_from(json!({ "date": "2026-08-01", "weight": "62.5", "steps": "8000" }));
        let (_, log) = req.into_new_log().unwrap();
        assert_eq!(log.weight, Some(62.5));
        assert_eq!(log.steps, Some(8000));
    }

    #[test]
    fn test_garbage_numeric_string_is_validation_error_not_zero() {
        let req = upsert_from(json!({ "date": "2026-08-01", "weight": "sixty" }));
        let err = req.into_new_log().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_empty_numeric_string_means_absent() {
        let req = upsert_from(json!({ "date": "2026-08-01", "weight": "" }));
        let (_, log) = req.into_new_log().unwrap();
        assert_eq!(log.weight, None);
    }

    #[test]
    fn test_alcohol_defaults_to_zero_not_null() {
        let req = upsert_from(json!({ "date": "2026-08-01" }));
        let (_, log) = req.into_new_log().unwrap();
        assert_eq!(log.alcohol_amount, 0.0);
    }

    #[test]
    fn test_negative_alcohol_rejected() {
        let req = upsert_from(json!({ "date": "2026-08-01", "alcohol_amount": -50 }));
        assert!(matches!(
            req.into_new_log().unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_mood_out_of_range_rejected() {
        let req = upsert_from(json!({ "date": "2026-08-01", "general_mood": 6 }));
        assert!(matches!(
            req.into_new_log().unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_unknown_fields_in_patch_are_ignored() {
        let req: PatchHealthLogRequest = serde_json::from_value(json!({
            "memo": "felt fine",
            "alcohol_amount": 500,
            "ai_comment": "client must not write this"
        }))
        .unwrap();
        let patch = req.into_patch().unwrap();
        assert_eq!(patch.memo.as_deref(), Some("felt fine"));
        assert!(patch.general_mood.is_none());
    }

    #[test]
    fn test_patch_empty_string_clears_weight() {
        let req: PatchHealthLogRequest =
            serde_json::from_value(json!({ "weight": "" })).unwrap();
        let patch = req.into_patch().unwrap();
        assert_eq!(patch.weight, Some(None));
    }

    #[test]
    fn test_patch_omitted_weight_left_unchanged() {
        let req: PatchHealthLogRequest = serde_json::from_value(json!({})).unwrap();
        let patch = req.into_patch().unwrap();
        assert_eq!(patch.weight, None);
    }

    #[test]
    fn test_stool_type_wire_names() {
        assert_eq!(
            serde_json::to_value(StoolType::Bloody).unwrap(),
            json!("bloody")
        );
        let st: StoolType = serde_json::from_value(json!("diarrhea")).unwrap();
        assert_eq!(st, StoolType::Diarrhea);
    }

    #[test]
    fn test_health_log_serializes_contract_field_names() {
        let log = HealthLog {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            general_mood: Some(4),
            pain_level: Some(1),
            meal_description: None,
            stool_type: Some(StoolType::Normal),
            alcohol_amount: 0.0,
            alcohol_percent: None,
            alcohol_type: None,
            alcohol_reason: None,
            medication_taken: Some(true),
            stress_level: None,
            sleep_quality: None,
            spending: None,
            weight: None,
            body_fat: None,
            calories: None,
            protein: None,
            steps: None,
            exercise_minutes: None,
            period_status: Some(PeriodStatus::None),
            memo: None,
            ai_comment: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let v = serde_json::to_value(&log).unwrap();
        assert_eq!(v["date"], json!("2026-08-01"));
        assert_eq!(v["general_mood"], json!(4));
        assert_eq!(v["stool_type"], json!("normal"));
        assert_eq!(v["period_status"], json!("none"));
        assert!(v.get("log_date").is_none());
    }
}
