//! Builds the structured payload handed to the generation service. Pure:
//! no I/O, no side effects. Cross-day correlation in window mode is
//! deliberately left to the downstream model; this module only lines up the
//! facts.

use crate::engine::classifier::{Classification, Tier};
use crate::engine::signals::DaySignals;
use crate::models::health_log::HealthLog;
use crate::models::user_settings::{Gender, UserSettings};

/// Response length budgets per mode, carried as payload metadata. The
/// generator is asked to respect them; nothing here enforces them.
pub const DAILY_MAX_CHARS: usize = 250;
pub const WINDOW_MAX_CHARS: usize = 400;

pub const NO_DATA_LINE: &str = "(no records in this window)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Daily,
    Window { days: u32 },
}

#[derive(Debug, Clone)]
pub struct CoachContext {
    pub mode: ReportMode,
    /// Human-readable enabled concern areas. In emergency tier the body
    /// composition entry is dropped regardless of the user's flag.
    pub concern_modes: Vec<String>,
    pub medical_history: String,
    pub current_medications: String,
    /// Daily mode: the day's present signals as `label: value` lines.
    pub signal_lines: Vec<String>,
    /// Window mode: one line per recorded day, ascending; `NO_DATA_LINE`
    /// when the range is empty.
    pub window_lines: Vec<String>,
    pub tier: Option<Tier>,
    pub commendation: bool,
    pub evidence: Vec<String>,
    pub cycle_aware: bool,
    pub max_response_chars: usize,
}

fn concern_modes(settings: &UserSettings, suppress_diet: bool) -> Vec<String> {
    let mut modes = Vec::new();
    if settings.mode_ibd {
        modes.push("clinical / inflammatory condition tracking".to_string());
    }
    if settings.mode_alcohol {
        modes.push("alcohol habits".to_string());
    }
    if settings.mode_mental {
        modes.push("mental wellbeing".to_string());
    }
    if settings.mode_diet && !suppress_diet {
        modes.push("body composition and diet".to_string());
    }
    modes
}

pub fn assemble_daily(
    signals: &DaySignals,
    classification: &Classification,
    settings: &UserSettings,
) -> CoachContext {
    let suppress_diet = classification.tier == Tier::Emergency;
    CoachContext {
        mode: ReportMode::Daily,
        concern_modes: concern_modes(settings, suppress_diet),
        medical_history: settings.medical_history.clone(),
        current_medications: settings.current_medications.clone(),
        signal_lines: signals.lines(),
        window_lines: Vec::new(),
        tier: Some(classification.tier),
        commendation: classification.commendation,
        evidence: classification.evidence.clone(),
        cycle_aware: settings.gender == Gender::Female,
        max_response_chars: DAILY_MAX_CHARS,
    }
}

pub fn assemble_window(logs: &[HealthLog], settings: &UserSettings, days: u32) -> CoachContext {
    let window_lines = if logs.is_empty() {
        vec![NO_DATA_LINE.to_string()]
    } else {
        logs.iter()
            .map(|log| {
                let s = DaySignals::from_log(log);
                format!("{}: {}", log.date, s.lines().join("; "))
            })
            .collect()
    };

    CoachContext {
        mode: ReportMode::Window { days },
        concern_modes: concern_modes(settings, false),
        medical_history: settings.medical_history.clone(),
        current_medications: settings.current_medications.clone(),
        signal_lines: Vec::new(),
        window_lines,
        tier: None,
        commendation: false,
        evidence: Vec::new(),
        cycle_aware: settings.gender == Gender::Female,
        max_response_chars: WINDOW_MAX_CHARS,
    }
}

impl CoachContext {
    pub fn system_prompt(&self) -> String {
        let mut out = String::from(
            "You are a strict but deeply caring health coach for someone managing \
             a chronic inflammatory condition. Be direct and a little stern, but \
             let genuine concern for the user show through.\n",
        );

        match self.mode {
            ReportMode::Daily => match self.tier {
                Some(Tier::Emergency) => out.push_str(
                    "Today looks rough. Limit your advice to rest, a gentle diet, \
                     and confirming that medication was taken. Do NOT comment on \
                     body composition, weight, or diet progress today.\n",
                ),
                Some(Tier::Contradiction) => out.push_str(
                    "The record suggests the user's own choices likely caused \
                     today's discomfort. Point out the cause-and-effect explicitly, \
                     using the evidence provided.\n",
                ),
                _ => out.push_str(
                    "Give ordinary day-to-day feedback scoped to the user's \
                     enabled concern areas.\n",
                ),
            },
            ReportMode::Window { days } => {
                out.push_str(&format!(
                    "Analyze the past {days} days of records like a detective \
                     hunting for cause and effect. Do not just summarize or list \
                     averages. Look for: meals followed by next-day pain or stool \
                     changes, alcohol followed by poor sleep or low mood, and \
                     stress patterns. Where the data is too thin to conclude \
                     anything, say so honestly.\n"
                ));
            }
        }

        if self.commendation {
            out.push_str(
                "The user earned some credit today; soften your tone and \
                 acknowledge what went well before anything else.\n",
            );
        }
        if self.cycle_aware {
            out.push_str(
                "Where period_status is recorded, consider the menstrual cycle \
                 when explaining mood, skin, or digestive changes.\n",
            );
        }

        out.push_str(&format!(
            "Reply in at most {} characters, with line breaks for readability.\n",
            self.max_response_chars
        ));
        out
    }

    pub fn user_prompt(&self) -> String {
        let mut out = String::from("## About me\n");
        out.push_str(&format!(
            "- Medical history: {}\n",
            or_none(&self.medical_history)
        ));
        out.push_str(&format!(
            "- Current medications: {}\n",
            or_none(&self.current_medications)
        ));
        out.push_str(&format!(
            "- Focus areas: {}\n",
            if self.concern_modes.is_empty() {
                "none".to_string()
            } else {
                self.concern_modes.join(", ")
            }
        ));

        match self.mode {
            ReportMode::Daily => {
                out.push_str("\n## Today's record\n");
                if self.signal_lines.is_empty() {
                    out.push_str("(nothing recorded)\n");
                } else {
                    for line in &self.signal_lines {
                        out.push_str(&format!("- {line}\n"));
                    }
                }
                if !self.evidence.is_empty() {
                    out.push_str("\n## What stood out\n");
                    for e in &self.evidence {
                        out.push_str(&format!("- {e}\n"));
                    }
                }
            }
            ReportMode::Window { days } => {
                out.push_str(&format!("\n## Records, last {days} days\n"));
                for line in &self.window_lines {
                    out.push_str(&format!("- {line}\n"));
                }
            }
        }
        out
    }
}

fn or_none(s: &str) -> &str {
    if s.trim().is_empty() {
        "none"
    } else {
        s
    }
}
