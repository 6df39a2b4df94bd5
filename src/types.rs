//! Shared type definitions for the data core.
//!
//! Everything here is persisted or mirrored as camelCase JSON. Dated
//! fields are day-strings (`YYYY-MM-DD`) and clock-strings (`HH:MM`);
//! timestamps are RFC 3339. Color fields stay free strings so legacy hex
//! values written by earlier releases round-trip unchanged (resolution to
//! a palette key lives in `colors`).

use serde::{Deserialize, Serialize};

// ============================================================================
// Collections
// ============================================================================

/// The seven per-user collections held locally and mirrored remotely.
///
/// Local keys are `<userId>:<domain>:<name>`; the remote document store
/// keeps one document per (user, collection) addressed by `remote_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Objectives,
    Tasks,
    Events,
    FocusSessions,
    Streak,
    Prefs,
    Goal,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Objectives,
        Collection::Tasks,
        Collection::Events,
        Collection::FocusSessions,
        Collection::Streak,
        Collection::Prefs,
        Collection::Goal,
    ];

    /// Key namespace segment grouping related collections.
    pub fn domain(&self) -> &'static str {
        match self {
            Self::Objectives | Self::Tasks => "planner",
            Self::Events => "calendar",
            Self::FocusSessions | Self::Streak => "focus",
            Self::Prefs | Self::Goal => "settings",
        }
    }

    /// Key leaf name within the domain.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Objectives => "objectives",
            Self::Tasks => "tasks",
            Self::Events => "events",
            Self::FocusSessions => "sessions",
            Self::Streak => "streak",
            Self::Prefs => "prefs",
            Self::Goal => "goal",
        }
    }

    /// Document name at the remote store boundary.
    pub fn remote_name(&self) -> &'static str {
        match self {
            Self::Objectives => "objectives",
            Self::Tasks => "tasks",
            Self::Events => "events",
            Self::FocusSessions => "focusSessions",
            Self::Streak => "streak",
            Self::Prefs => "prefs",
            Self::Goal => "goal",
        }
    }
}

// ============================================================================
// Objectives & tasks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ObjectiveCategory {
    Work,
    Personal,
    Health,
    Learning,
    Finance,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ObjectiveStatus {
    #[default]
    Active,
    Completed,
}

/// A long-running goal the user is working toward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: ObjectiveCategory,
    /// Named palette key, or a legacy hex literal from older releases.
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub status: ObjectiveStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// A unit of work under an objective.
///
/// Invariant: `completed_at` is set iff `status == Completed`. Every write
/// path that flips status maintains both fields together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub objective_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    /// 1 (lowest) to 4 (highest).
    pub importance: u8,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Partial update for a task. `Some(None)` on a clearable field clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub deadline: Option<Option<String>>,
    pub importance: Option<u8>,
    pub status: Option<TaskStatus>,
}

/// Partial update for an objective. `Some(None)` on a clearable field clears it.
#[derive(Debug, Clone, Default)]
pub struct ObjectivePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<ObjectiveCategory>,
    pub color: Option<String>,
    pub deadline: Option<Option<String>>,
    pub status: Option<ObjectiveStatus>,
}

// ============================================================================
// Calendar events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Reminder {
    #[default]
    None,
    AtTime,
    TenMinutes,
    OneHour,
    OneDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    #[default]
    Event,
    Birthday,
}

/// A calendar entry owned by the user.
///
/// Recurring series are materialized: the base record plus derived
/// siblings whose id is `<baseId>_r<index>`. Siblings share
/// title/color/notes and carry their own dated fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalEvent {
    pub id: String,
    pub title: String,
    pub all_day: bool,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub reminder: Reminder,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub event_type: EventType,
    /// Birthdays only: the year the person was born. When absent, the base
    /// instance's start year stands in for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
}

// ============================================================================
// Focus sessions
// ============================================================================

/// One completed focus interval. Append-only: never mutated, only
/// aggregated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub date: String,
    pub start_time: String,
    pub minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

// ============================================================================
// Settings & counters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

/// Theme and timer preferences, mirrored as one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPrefs {
    pub theme: ThemeMode,
    pub accent_color: String,
    pub focus_minutes: u32,
    pub break_minutes: u32,
}

impl Default for UserPrefs {
    fn default() -> Self {
        Self {
            theme: ThemeMode::System,
            accent_color: "blue".to_string(),
            focus_minutes: 25,
            break_minutes: 5,
        }
    }
}

/// Login streak counter.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}
