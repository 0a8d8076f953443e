//! Deterministic priority classification for daily coaching. Tiers are
//! evaluated top-down and the first match wins; the commendation flag is a
//! tone modifier evaluated independently, but never set alongside the
//! emergency tier.

use crate::engine::signals::{trigger_food_match, healthy_food_match, DaySignals};
use crate::models::health_log::StoolType;
use crate::models::user_settings::UserSettings;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Emergency,
    Contradiction,
    Routine,
}

#[derive(Debug, Clone)]
pub struct Classification {
    pub tier: Tier,
    pub commendation: bool,
    pub evidence: Vec<String>,
}

/// Classify a day's signals. `yesterday` feeds only the contradiction tier
/// (alcohol and trigger-food carry-over to next-day symptoms).
pub fn classify(
    today: &DaySignals,
    yesterday: Option<&DaySignals>,
    settings: &UserSettings,
) -> Classification {
    if let Some(evidence) = emergency_evidence(today) {
        return Classification {
            tier: Tier::Emergency,
            // never soften an emergency-tier message
            commendation: false,
            evidence,
        };
    }

    if let Some(evidence) = contradiction_evidence(today, yesterday, settings) {
        return Classification {
            tier: Tier::Contradiction,
            commendation: commendation(today),
            evidence,
        };
    }

    Classification {
        tier: Tier::Routine,
        commendation: commendation(today),
        evidence: Vec::new(),
    }
}

fn emergency_evidence(today: &DaySignals) -> Option<Vec<String>> {
    let mut evidence = Vec::new();
    if let Some(pain) = today.pain_level.filter(|p| *p >= 3) {
        evidence.push(format!("pain_level={pain}"));
    }
    match today.stool_type {
        Some(st @ (StoolType::Bloody | StoolType::Diarrhea)) => {
            evidence.push(format!("stool_type={}", st.as_str()));
        }
        _ => {}
    }
    if let Some(mood) = today.general_mood.filter(|m| *m <= 2) {
        evidence.push(format!("general_mood={mood}"));
    }
    if evidence.is_empty() {
        None
    } else {
        Some(evidence)
    }
}

/// A mild unwell signal (below the emergency thresholds, which already
/// returned) co-occurring with a plausible self-inflicted cause.
fn contradiction_evidence(
    today: &DaySignals,
    yesterday: Option<&DaySignals>,
    settings: &UserSettings,
) -> Option<Vec<String>> {
    let mut unwell = Vec::new();
    if let Some(pain) = today.pain_level.filter(|p| *p >= 2) {
        unwell.push(format!("pain_level={pain}"));
    }
    if today.stool_type == Some(StoolType::Loose) {
        unwell.push("stool_type=loose".to_string());
    }
    if unwell.is_empty() {
        return None;
    }

    let mut causes = Vec::new();
    if let Some(amount) = today.alcohol_amount.filter(|a| *a > 0.0) {
        causes.push(format!("alcohol_amount={amount} (today)"));
    }
    if let Some(amount) = yesterday
        .and_then(|y| y.alcohol_amount)
        .filter(|a| *a > 0.0)
    {
        causes.push(format!("alcohol_amount={amount} (yesterday)"));
    }
    if today.medication_taken == Some(false) && !settings.current_medications.trim().is_empty() {
        causes.push("medication_taken=false with medications on file".to_string());
    }
    if let Some(kw) = today
        .meal_description
        .as_deref()
        .and_then(trigger_food_match)
    {
        causes.push(format!("meal_description contains \"{kw}\" (today)"));
    }
    if let Some(kw) = yesterday
        .and_then(|y| y.meal_description.as_deref())
        .and_then(trigger_food_match)
    {
        causes.push(format!("meal_description contains \"{kw}\" (yesterday)"));
    }

    if causes.is_empty() {
        return None;
    }

    unwell.extend(causes);
    Some(unwell)
}

fn commendation(today: &DaySignals) -> bool {
    let average_or_better = today.general_mood.is_some_and(|m| m >= 3);

    if average_or_better && today.alcohol_amount == Some(0.0) {
        return true;
    }
    if average_or_better && today.exercise_minutes.is_some_and(|m| m > 0) {
        return true;
    }
    today
        .meal_description
        .as_deref()
        .and_then(healthy_food_match)
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::health_log::HealthLog;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn log() -> HealthLog {
        crate::engine::signals::tests::blank_log(NaiveDate::from_ymd_opt(2026, 8, 20).unwrap())
    }

    fn settings() -> UserSettings {
        UserSettings::default_for(Uuid::nil())
    }

    fn signals(f: impl FnOnce(&mut HealthLog)) -> DaySignals {
        let mut l = log();
        f(&mut l);
        DaySignals::from_log(&l)
    }

    #[test]
    fn test_high_pain_is_emergency_even_with_zero_alcohol_and_diet_mode() {
        let today = signals(|l| {
            l.pain_level = Some(4);
            l.alcohol_amount = 0.0;
            l.general_mood = Some(4);
        });
        let mut s = settings();
        s.mode_diet = true;

        let c = classify(&today, None, &s);
        assert_eq!(c.tier, Tier::Emergency);
        assert!(!c.commendation);
        assert_eq!(c.evidence, vec!["pain_level=4"]);
    }

    #[test]
    fn test_bloody_stool_is_emergency() {
        let today = signals(|l| l.stool_type = Some(StoolType::Bloody));
        let c = classify(&today, None, &settings());
        assert_eq!(c.tier, Tier::Emergency);
        assert_eq!(c.evidence, vec!["stool_type=bloody"]);
    }

    #[test]
    fn test_low_mood_preempts_contradiction_and_names_mood_as_cause() {
        let today = signals(|l| {
            l.general_mood = Some(2);
            l.alcohol_amount = 200.0;
        });
        let c = classify(&today, None, &settings());
        assert_eq!(c.tier, Tier::Emergency);
        assert_eq!(c.evidence[0], "general_mood=2");
        assert!(!c.evidence.iter().any(|e| e.contains("alcohol")));
    }

    #[test]
    fn test_mild_pain_with_alcohol_is_contradiction() {
        let today = signals(|l| {
            l.pain_level = Some(2);
            l.alcohol_amount = 350.0;
        });
        let c = classify(&today, None, &settings());
        assert_eq!(c.tier, Tier::Contradiction);
        assert!(c.evidence.contains(&"pain_level=2".to_string()));
        assert!(c.evidence.iter().any(|e| e.contains("alcohol_amount=350")));
    }

    #[test]
    fn test_loose_stool_after_trigger_food_yesterday_is_contradiction() {
        let today = signals(|l| l.stool_type = Some(StoolType::Loose));
        let yesterday = signals(|l| l.meal_description = Some("spicy ramen".into()));
        let c = classify(&today, Some(&yesterday), &settings());
        assert_eq!(c.tier, Tier::Contradiction);
        assert!(c.evidence.iter().any(|e| e.contains("(yesterday)")));
    }

    #[test]
    fn test_skipped_medication_counts_only_with_medications_on_file() {
        let today = signals(|l| {
            l.pain_level = Some(2);
            l.medication_taken = Some(false);
        });

        let c = classify(&today, None, &settings());
        assert_eq!(c.tier, Tier::Routine, "no medications on file");

        let mut s = settings();
        s.current_medications = "mesalazine 2g".into();
        let c = classify(&today, None, &s);
        assert_eq!(c.tier, Tier::Contradiction);
        assert!(c
            .evidence
            .iter()
            .any(|e| e.contains("medication_taken=false")));
    }

    #[test]
    fn test_sober_exercise_day_is_commended_routine() {
        let today = signals(|l| {
            l.general_mood = Some(3);
            l.pain_level = Some(1);
            l.alcohol_amount = 0.0;
            l.exercise_minutes = Some(30);
        });
        let c = classify(&today, None, &settings());
        assert_eq!(c.tier, Tier::Routine);
        assert!(c.commendation);
    }

    #[test]
    fn test_healthy_meal_alone_is_commended() {
        let today = signals(|l| {
            l.meal_description = Some("grilled fish and salad".into());
            l.alcohol_amount = 120.0;
        });
        let c = classify(&today, None, &settings());
        assert_eq!(c.tier, Tier::Routine);
        assert!(c.commendation);
    }

    #[test]
    fn test_commendation_can_coexist_with_contradiction() {
        let today = signals(|l| {
            l.general_mood = Some(3);
            l.pain_level = Some(2);
            l.alcohol_amount = 0.0;
            l.meal_description = Some("curry for lunch".into());
        });
        let c = classify(&today, None, &settings());
        assert_eq!(c.tier, Tier::Contradiction);
        assert!(c.commendation);
    }

    #[test]
    fn test_empty_day_is_routine_without_commendation() {
        let today = signals(|l| l.alcohol_amount = 0.0);
        let c = classify(&today, None, &settings());
        assert_eq!(c.tier, Tier::Routine);
        // alcohol is zero but mood is unknown, so nothing to commend
        assert!(!c.commendation);
        assert!(c.evidence.is_empty());
    }
}
