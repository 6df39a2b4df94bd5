//! Per-user settings and counters: theme/timer preferences, the daily
//! task goal, and the login streak.

use super::LocalStore;
use crate::dates::{add_days, parse_day};
use crate::error::StoreError;
use crate::types::{Collection, StreakState, UserPrefs};

/// Daily task goal when the user has never set one.
pub const DEFAULT_DAILY_GOAL: u32 = 3;

impl LocalStore {
    /// Theme and timer preferences (defaults when unset or signed out).
    pub fn prefs(&self) -> Result<UserPrefs, StoreError> {
        self.read_doc(Collection::Prefs)
    }

    pub fn set_prefs(&self, prefs: &UserPrefs) -> Result<(), StoreError> {
        self.write_doc(Collection::Prefs, prefs)
    }

    /// The daily task goal.
    pub fn daily_goal(&self) -> Result<u32, StoreError> {
        Ok(self
            .read_doc_opt::<u32>(Collection::Goal)?
            .unwrap_or(DEFAULT_DAILY_GOAL))
    }

    pub fn set_daily_goal(&self, goal: u32) -> Result<(), StoreError> {
        self.write_doc(Collection::Goal, &goal)
    }

    /// Current login streak.
    pub fn streak(&self) -> Result<StreakState, StoreError> {
        self.read_doc(Collection::Streak)
    }

    /// Record a login on `today`. Consecutive days extend the streak, a
    /// gap resets it to 1, and repeat logins on the same day are
    /// idempotent. Returns the resulting state; signed out, the default.
    pub fn record_login(&self, today: &str) -> Result<StreakState, StoreError> {
        parse_day(today)?;
        if self.active_user().is_none() {
            return Ok(StreakState::default());
        }

        let mut streak: StreakState = self.read_doc(Collection::Streak)?;
        match streak.last_login.as_deref() {
            Some(last) if last == today => return Ok(streak),
            Some(last) if add_days(last, 1).map(|d| d == today).unwrap_or(false) => {
                streak.count += 1;
            }
            _ => streak.count = 1,
        }
        streak.last_login = Some(today.to_string());
        self.write_doc(Collection::Streak, &streak)?;
        Ok(streak)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{signed_out_store, test_store};
    use super::*;
    use crate::types::ThemeMode;

    #[test]
    fn test_prefs_round_trip() {
        let store = test_store();
        assert_eq!(store.prefs().unwrap().theme, ThemeMode::System);

        let mut prefs = store.prefs().unwrap();
        prefs.theme = ThemeMode::Dark;
        prefs.accent_color = "teal".to_string();
        prefs.focus_minutes = 50;
        store.set_prefs(&prefs).unwrap();

        let read = store.prefs().unwrap();
        assert_eq!(read.theme, ThemeMode::Dark);
        assert_eq!(read.accent_color, "teal");
        assert_eq!(read.focus_minutes, 50);
    }

    #[test]
    fn test_daily_goal_default_and_override() {
        let store = test_store();
        assert_eq!(store.daily_goal().unwrap(), DEFAULT_DAILY_GOAL);
        store.set_daily_goal(7).unwrap();
        assert_eq!(store.daily_goal().unwrap(), 7);
        // Zero is a legitimate stored value, not absence.
        store.set_daily_goal(0).unwrap();
        assert_eq!(store.daily_goal().unwrap(), 0);
    }

    #[test]
    fn test_streak_extends_on_consecutive_days() {
        let store = test_store();
        assert_eq!(store.record_login("2026-08-04").unwrap().count, 1);
        assert_eq!(store.record_login("2026-08-05").unwrap().count, 2);
        assert_eq!(store.record_login("2026-08-06").unwrap().count, 3);
    }

    #[test]
    fn test_streak_same_day_is_idempotent() {
        let store = test_store();
        store.record_login("2026-08-05").unwrap();
        let again = store.record_login("2026-08-05").unwrap();
        assert_eq!(again.count, 1);
        assert_eq!(again.last_login.as_deref(), Some("2026-08-05"));
    }

    #[test]
    fn test_streak_resets_after_gap() {
        let store = test_store();
        store.record_login("2026-08-01").unwrap();
        store.record_login("2026-08-02").unwrap();
        let after_gap = store.record_login("2026-08-05").unwrap();
        assert_eq!(after_gap.count, 1);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let store = test_store();
        store.record_login("2026-07-31").unwrap();
        assert_eq!(store.record_login("2026-08-01").unwrap().count, 2);
    }

    #[test]
    fn test_signed_out_defaults() {
        let store = signed_out_store();
        assert_eq!(store.daily_goal().unwrap(), DEFAULT_DAILY_GOAL);
        let state = store.record_login("2026-08-05").unwrap();
        assert_eq!(state.count, 0);
        store.set_active_user("user-1").unwrap();
        assert_eq!(store.streak().unwrap().count, 0);
    }
}
