//! Focus session log and aggregates.
//!
//! Sessions are append-only: once logged they are never mutated, only
//! summed and bucketed.

use super::LocalStore;
use crate::dates::{parse_clock, parse_day};
use crate::error::StoreError;
use crate::types::{Collection, FocusSession};

impl LocalStore {
    /// The full session log for the active user.
    pub fn focus_sessions(&self) -> Result<Vec<FocusSession>, StoreError> {
        self.read_collection(Collection::FocusSessions)
    }

    /// Append one completed session. No-op when signed out.
    pub fn log_focus_session(&self, session: FocusSession) -> Result<(), StoreError> {
        if self.active_user().is_none() {
            return Ok(());
        }
        parse_day(&session.date)?;
        parse_clock(&session.start_time)?;

        let mut sessions = self.focus_sessions()?;
        sessions.push(session);
        self.write_collection(Collection::FocusSessions, &sessions)
    }

    /// Total focused minutes on one day.
    pub fn focus_minutes_for_day(&self, day: &str) -> Result<u32, StoreError> {
        Ok(self
            .focus_sessions()?
            .iter()
            .filter(|s| s.date == day)
            .map(|s| s.minutes)
            .sum())
    }

    /// Number of sessions logged on one day.
    pub fn focus_session_count_for_day(&self, day: &str) -> Result<usize, StoreError> {
        Ok(self.focus_sessions()?.iter().filter(|s| s.date == day).count())
    }

    /// Total focused minutes attributed to one task, across all days.
    pub fn focus_minutes_for_task(&self, task_id: &str) -> Result<u32, StoreError> {
        Ok(self
            .focus_sessions()?
            .iter()
            .filter(|s| s.task_id.as_deref() == Some(task_id))
            .map(|s| s.minutes)
            .sum())
    }

    /// Minutes bucketed by starting hour for one day. Sessions with an
    /// unparseable start time land nowhere.
    pub fn focus_hour_histogram(&self, day: &str) -> Result<[u32; 24], StoreError> {
        let mut buckets = [0u32; 24];
        for session in self.focus_sessions()? {
            if session.date != day {
                continue;
            }
            if let Ok(t) = parse_clock(&session.start_time) {
                use chrono::Timelike;
                buckets[t.hour() as usize] += session.minutes;
            }
        }
        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{signed_out_store, test_store};
    use super::*;

    fn session(day: &str, start: &str, minutes: u32, task: Option<&str>) -> FocusSession {
        FocusSession {
            date: day.to_string(),
            start_time: start.to_string(),
            minutes,
            task_id: task.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_log_and_sum() {
        let store = test_store();
        store.log_focus_session(session("2026-08-05", "09:00", 25, None)).unwrap();
        store.log_focus_session(session("2026-08-05", "09:30", 25, None)).unwrap();
        store.log_focus_session(session("2026-08-06", "10:00", 50, None)).unwrap();

        assert_eq!(store.focus_minutes_for_day("2026-08-05").unwrap(), 50);
        assert_eq!(store.focus_session_count_for_day("2026-08-05").unwrap(), 2);
        assert_eq!(store.focus_minutes_for_day("2026-08-07").unwrap(), 0);
    }

    #[test]
    fn test_per_task_attribution() {
        let store = test_store();
        store.log_focus_session(session("2026-08-05", "09:00", 25, Some("t1"))).unwrap();
        store.log_focus_session(session("2026-08-06", "09:00", 30, Some("t1"))).unwrap();
        store.log_focus_session(session("2026-08-05", "11:00", 25, Some("t2"))).unwrap();
        store.log_focus_session(session("2026-08-05", "13:00", 25, None)).unwrap();

        assert_eq!(store.focus_minutes_for_task("t1").unwrap(), 55);
        assert_eq!(store.focus_minutes_for_task("t2").unwrap(), 25);
        assert_eq!(store.focus_minutes_for_task("t3").unwrap(), 0);
    }

    #[test]
    fn test_hour_histogram() {
        let store = test_store();
        store.log_focus_session(session("2026-08-05", "09:05", 25, None)).unwrap();
        store.log_focus_session(session("2026-08-05", "09:40", 20, None)).unwrap();
        store.log_focus_session(session("2026-08-05", "14:00", 50, None)).unwrap();
        store.log_focus_session(session("2026-08-06", "09:00", 99, None)).unwrap();

        let buckets = store.focus_hour_histogram("2026-08-05").unwrap();
        assert_eq!(buckets[9], 45);
        assert_eq!(buckets[14], 50);
        assert_eq!(buckets.iter().sum::<u32>(), 95);
    }

    #[test]
    fn test_rejects_malformed_inputs() {
        let store = test_store();
        assert!(store.log_focus_session(session("08/05/2026", "09:00", 25, None)).is_err());
        assert!(store.log_focus_session(session("2026-08-05", "9am", 25, None)).is_err());
    }

    #[test]
    fn test_signed_out_log_is_noop() {
        let store = signed_out_store();
        store.log_focus_session(session("2026-08-05", "09:00", 25, None)).unwrap();
        store.set_active_user("user-1").unwrap();
        assert!(store.focus_sessions().unwrap().is_empty());
    }
}
