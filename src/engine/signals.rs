//! Normalizes a raw health log into presence-aware signals. A field is
//! present only if it was supplied and is not an empty string; numeric zero
//! IS a present value (alcohol_amount = 0 means "drank nothing", which is
//! information), and medication_taken = false is distinct from no data.

use chrono::NaiveDate;

use crate::models::health_log::{HealthLog, PeriodStatus, StoolType};

#[derive(Debug, Clone)]
pub struct DaySignals {
    pub date: NaiveDate,
    pub general_mood: Option<i32>,
    pub pain_level: Option<i32>,
    pub meal_description: Option<String>,
    pub stool_type: Option<StoolType>,
    pub alcohol_amount: Option<f64>,
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
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

impl DaySignals {
    pub fn from_log(log: &HealthLog) -> Self {
        Self {
            date: log.date,
            general_mood: log.general_mood,
            pain_level: log.pain_level,
            meal_description: non_empty(&log.meal_description),
            stool_type: log.stool_type,
            // the column is non-null with default 0, so the value is always present
            alcohol_amount: Some(log.alcohol_amount),
            alcohol_percent: log.alcohol_percent,
            alcohol_type: non_empty(&log.alcohol_type),
            alcohol_reason: non_empty(&log.alcohol_reason),
            medication_taken: log.medication_taken,
            stress_level: log.stress_level,
            sleep_quality: non_empty(&log.sleep_quality),
            spending: log.spending,
            weight: log.weight,
            body_fat: log.body_fat,
            calories: log.calories,
            protein: log.protein,
            steps: log.steps,
            exercise_minutes: log.exercise_minutes,
            period_status: log.period_status,
            memo: non_empty(&log.memo),
        }
    }

    /// Renders present signals as `label: value` lines, omitting anything
    /// absent. medication_taken: false comes through explicitly.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(v) = self.general_mood {
            out.push(format!("general_mood: {v}/5"));
        }
        if let Some(v) = self.pain_level {
            out.push(format!("pain_level: {v}/5"));
        }
        if let Some(v) = &self.meal_description {
            out.push(format!("meal_description: {v}"));
        }
        if let Some(v) = self.stool_type {
            out.push(format!("stool_type: {}", v.as_str()));
        }
        if let Some(v) = self.alcohol_amount {
            let mut line = format!("alcohol_amount: {v} ml");
            if let Some(p) = self.alcohol_percent {
                line.push_str(&format!(" ({p}%)"));
            }
            if let Some(t) = &self.alcohol_type {
                line.push_str(&format!(" {t}"));
            }
            out.push(line);
            if let Some(r) = &self.alcohol_reason {
                out.push(format!("alcohol_reason: {r}"));
            }
        }
        if let Some(v) = self.medication_taken {
            out.push(format!("medication_taken: {v}"));
        }
        if let Some(v) = self.stress_level {
            out.push(format!("stress_level: {v}/10"));
        }
        if let Some(v) = &self.sleep_quality {
            out.push(format!("sleep_quality: {v}"));
        }
        if let Some(v) = self.spending {
            out.push(format!("spending: {v}"));
        }
        if let Some(v) = self.weight {
            out.push(format!("weight: {v} kg"));
        }
        if let Some(v) = self.body_fat {
            out.push(format!("body_fat: {v}%"));
        }
        if let Some(v) = self.calories {
            out.push(format!("calories: {v} kcal"));
        }
        if let Some(v) = self.protein {
            out.push(format!("protein: {v} g"));
        }
        if let Some(v) = self.steps {
            out.push(format!("steps: {v}"));
        }
        if let Some(v) = self.exercise_minutes {
            out.push(format!("exercise_minutes: {v}"));
        }
        if let Some(v) = self.period_status {
            out.push(format!("period_status: {}", v.as_str()));
        }
        if let Some(v) = &self.memo {
            out.push(format!("memo: {v}"));
        }
        out
    }
}

const TRIGGER_FOODS: &[&str] = &[
    "fried",
    "deep-fried",
    "greasy",
    "fatty",
    "spicy",
    "chili",
    "curry",
    "ramen",
    "pizza",
    "pasta",
    "bread",
    "wheat",
    "gluten",
    "burger",
    "cake",
];

const HEALTHY_FOODS: &[&str] = &[
    "salad",
    "vegetable",
    "veggies",
    "steamed",
    "grilled fish",
    "fish",
    "tofu",
    "yogurt",
    "soup",
    "porridge",
    "oatmeal",
    "fruit",
    "brown rice",
];

fn first_keyword_match(meal: &str, keywords: &[&'static str]) -> Option<&'static str> {
    let lower = meal.to_lowercase();
    keywords.iter().copied().find(|kw| lower.contains(kw))
}

/// Rich/spicy/wheat-heavy indicators in a meal description. Returns the
/// matched keyword for the evidence list.
pub fn trigger_food_match(meal: &str) -> Option<&'static str> {
    first_keyword_match(meal, TRIGGER_FOODS)
}

pub fn healthy_food_match(meal: &str) -> Option<&'static str> {
    first_keyword_match(meal, HEALTHY_FOODS)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    pub(crate) fn blank_log(date: NaiveDate) -> HealthLog {
        HealthLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date,
            general_mood: None,
            pain_level: None,
            meal_description: None,
            stool_type: None,
            alcohol_amount: 0.0,
            alcohol_percent: None,
            alcohol_type: None,
            alcohol_reason: None,
            medication_taken: None,
            stress_level: None,
            sleep_quality: None,
            spending: None,
            weight: None,
            body_fat: None,
            calories: None,
            protein: None,
            steps: None,
            exercise_minutes: None,
            period_status: None,
            memo: None,
            ai_comment: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 20).unwrap()
    }

    #[test]
    fn test_empty_string_is_absent() {
        let mut log = blank_log(date());
        log.meal_description = Some("   ".into());
        log.memo = Some(String::new());
        let s = DaySignals::from_log(&log);
        assert!(s.meal_description.is_none());
        assert!(s.memo.is_none());
    }

    #[test]
    fn test_zero_alcohol_is_present() {
        let log = blank_log(date());
        let s = DaySignals::from_log(&log);
        assert_eq!(s.alcohol_amount, Some(0.0));
        assert!(s.lines().iter().any(|l| l.starts_with("alcohol_amount: 0")));
    }

    #[test]
    fn test_medication_false_is_rendered_absent_is_not() {
        let mut log = blank_log(date());
        log.medication_taken = Some(false);
        let with = DaySignals::from_log(&log);
        assert!(with.lines().contains(&"medication_taken: false".to_string()));

        log.medication_taken = None;
        let without = DaySignals::from_log(&log);
        assert!(!without
            .lines()
            .iter()
            .any(|l| l.starts_with("medication_taken")));
    }

    #[test]
    fn test_absent_fields_omitted_from_lines() {
        let mut log = blank_log(date());
        log.general_mood = Some(4);
        let lines = DaySignals::from_log(&log).lines();
        assert!(lines.contains(&"general_mood: 4/5".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("weight")));
        assert!(!lines.iter().any(|l| l.starts_with("stool_type")));
    }

    #[test]
    fn test_trigger_and_healthy_food_matching() {
        assert_eq!(trigger_food_match("Fried chicken and beer"), Some("fried"));
        assert_eq!(trigger_food_match("udon with egg"), None);
        assert_eq!(healthy_food_match("big salad with tofu"), Some("salad"));
        assert_eq!(healthy_food_match("double cheeseburger"), None);
    }
}
