//! Weekly focus analytics.
//!
//! Buckets session durations into the seven fixed weekdays (Mon-Sun),
//! reported in minutes. The session store serves the same aggregation at
//! `GET /study/weekly`; keeping it as one pure function here means the
//! store-side endpoint and any local analytics cannot diverge.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Fixed weekday labels, Monday first, matching the store's wire format.
pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One weekday's accumulated focus, in minutes.
///
/// The wire field is named `streak` for historical reasons; it holds
/// minutes studied on that weekday, not a streak count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBucket {
    pub day: String,
    pub streak: f64,
}

/// Aggregate sessions into Mon-Sun minute buckets.
///
/// Every weekday appears in the output exactly once, zero-filled when no
/// session landed on it. Each session contributes `duration / 60` minutes
/// to the bucket of its creation weekday.
pub fn weekly_focus(sessions: &[Session]) -> Vec<WeeklyBucket> {
    let mut minutes = [0.0f64; 7];
    for session in sessions {
        let index = session.created_at.weekday().num_days_from_monday() as usize;
        minutes[index] += session.duration as f64 / 60.0;
    }
    WEEKDAYS
        .iter()
        .zip(minutes)
        .map(|(day, streak)| WeeklyBucket {
            day: (*day).to_string(),
            streak,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session_on(day: u32, duration: u64) -> Session {
        let mut session = Session::new_local("Math", vec![]);
        // March 2024: the 4th is a Monday.
        session.created_at = chrono::Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap();
        session.duration = duration;
        session
    }

    #[test]
    fn test_two_sessions_same_weekday_sum_in_minutes() {
        let sessions = vec![session_on(4, 600), session_on(4, 1200)];
        let weekly = weekly_focus(&sessions);
        assert_eq!(weekly.len(), 7);
        assert_eq!(weekly[0].day, "Mon");
        assert!((weekly[0].streak - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_weekdays_zero_filled() {
        let weekly = weekly_focus(&[session_on(6, 300)]);
        assert!((weekly[2].streak - 5.0).abs() < f64::EPSILON); // Wednesday the 6th
        for (i, bucket) in weekly.iter().enumerate() {
            if i != 2 {
                assert_eq!(bucket.streak, 0.0, "day {} should be empty", bucket.day);
            }
        }
    }

    #[test]
    fn test_weekday_order_is_mon_to_sun() {
        let weekly = weekly_focus(&[]);
        let days: Vec<&str> = weekly.iter().map(|b| b.day.as_str()).collect();
        assert_eq!(days, WEEKDAYS);
    }
}
