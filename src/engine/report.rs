//! Multi-day report windows. The window is fetched whole and handed to the
//! assembler as-is; cross-day correlation belongs to the generation service.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::engine::context::{assemble_window, CoachContext};
use crate::error::AppResult;
use crate::store;

/// Only 7 and 30 day windows exist; anything else falls back to 7.
pub fn clamp_window_days(days: i64) -> u32 {
    if days == 30 {
        30
    } else {
        7
    }
}

pub fn window_bounds(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(days as i64), today)
}

pub async fn build(db: &PgPool, user_id: Uuid, days: u32) -> AppResult<CoachContext> {
    let today = Utc::now().date_naive();
    let (start, end) = window_bounds(today, days);

    let logs = store::health_logs::get_range(db, user_id, start, end).await?;
    let settings = store::user_settings::get(db, user_id).await?;

    Ok(assemble_window(&logs, &settings, days))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_window_days() {
        assert_eq!(clamp_window_days(7), 7);
        assert_eq!(clamp_window_days(30), 30);
        assert_eq!(clamp_window_days(14), 7);
        assert_eq!(clamp_window_days(0), 7);
        assert_eq!(clamp_window_days(-3), 7);
    }

    #[test]
    fn test_window_bounds_inclusive_of_today() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        let (start, end) = window_bounds(today, 7);
        assert_eq!(end, today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 8, 13).unwrap());
    }
}
