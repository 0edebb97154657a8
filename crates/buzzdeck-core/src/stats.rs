//! Session and activity statistics for dashboard display.

use chrono::NaiveDate;

use crate::model::ActivityEntry;

/// Accuracy as a whole percentage; zero answered yields zero.
pub fn accuracy_percent(correct: u32, answered: usize) -> u32 {
    if answered == 0 {
        return 0;
    }
    ((correct as f64 / answered as f64) * 100.0).round() as u32
}

/// Consecutive days with at least one activity entry, counting back from
/// `today`. A streak that ended yesterday still counts; a gap before that
/// breaks it.
pub fn current_streak_days(entries: &[ActivityEntry], today: NaiveDate) -> u32 {
    let days: std::collections::HashSet<NaiveDate> =
        entries.iter().map(|e| e.timestamp.date_naive()).collect();

    let mut cursor = if days.contains(&today) {
        today
    } else if let Some(yesterday) = today.pred_opt().filter(|d| days.contains(d)) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry_on(year: i32, month: u32, day: u32) -> ActivityEntry {
        ActivityEntry {
            timestamp: Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
            description: "played".into(),
            kind: "reader".into(),
            score: None,
            study_set_id: None,
        }
    }

    #[test]
    fn accuracy_handles_zero_answered() {
        assert_eq!(accuracy_percent(0, 0), 0);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(3, 3), 100);
    }

    #[test]
    fn streak_counts_consecutive_days() {
        let entries = vec![
            entry_on(2025, 6, 10),
            entry_on(2025, 6, 11),
            entry_on(2025, 6, 12),
        ];
        let today = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
        assert_eq!(current_streak_days(&entries, today), 3);
    }

    #[test]
    fn streak_survives_missing_today() {
        let entries = vec![entry_on(2025, 6, 10), entry_on(2025, 6, 11)];
        let today = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
        assert_eq!(current_streak_days(&entries, today), 2);
    }

    #[test]
    fn streak_breaks_on_gap() {
        let entries = vec![entry_on(2025, 6, 8), entry_on(2025, 6, 12)];
        let today = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
        assert_eq!(current_streak_days(&entries, today), 1);
    }

    #[test]
    fn streak_zero_without_recent_activity() {
        let entries = vec![entry_on(2025, 6, 1)];
        let today = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
        assert_eq!(current_streak_days(&entries, today), 0);
    }
}
