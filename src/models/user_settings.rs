use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-user coaching settings. Absent row behaves as `default_for`: clinical
/// tracking on, everything else off.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSettings {
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub mode_ibd: bool,
    pub mode_alcohol: bool,
    pub mode_mental: bool,
    pub mode_diet: bool,
    pub medical_history: String,
    pub current_medications: String,
    pub gender: Gender,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

impl UserSettings {
    pub fn default_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            mode_ibd: true,
            mode_alcohol: false,
            mode_mental: false,
            mode_diet: false,
            medical_history: String::new(),
            current_medications: String::new(),
            gender: Gender::Unspecified,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Unspecified,
    Male,
    Female,
}

/// PUT /api/settings — full replace; omitted fields take the documented
/// defaults, matching the absent-row behavior.
#[derive(Debug, Deserialize)]
pub struct UpsertSettingsRequest {
    #[serde(default = "default_true")]
    pub mode_ibd: bool,
    #[serde(default)]
    pub mode_alcohol: bool,
    #[serde(default)]
    pub mode_mental: bool,
    #[serde(default)]
    pub mode_diet: bool,
    #[serde(default)]
    pub medical_history: String,
    #[serde(default)]
    pub current_medications: String,
    #[serde(default)]
    pub gender: Gender,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_settings_default_is_ibd_only() {
        let s = UserSettings::default_for(Uuid::nil());
        assert!(s.mode_ibd);
        assert!(!s.mode_alcohol);
        assert!(!s.mode_mental);
        assert!(!s.mode_diet);
        assert_eq!(s.gender, Gender::Unspecified);
    }

    #[test]
    fn test_upsert_request_defaults_match_absent_row() {
        let req: UpsertSettingsRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.mode_ibd);
        assert!(!req.mode_diet);
        assert_eq!(req.gender, Gender::Unspecified);
        assert!(req.medical_history.is_empty());
    }

    #[test]
    fn test_gender_wire_names() {
        let g: Gender = serde_json::from_value(json!("female")).unwrap();
        assert_eq!(g, Gender::Female);
        assert_eq!(serde_json::to_value(Gender::Unspecified).unwrap(), json!("unspecified"));
    }
}
