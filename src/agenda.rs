//! Day-bucketed agenda projection.
//!
//! `project` merges calendar events, tasks, objective deadlines and
//! generated holidays into one view keyed by day-string. It is pure and
//! synchronous over in-memory data — no I/O — so recomputing it on every
//! render is safe. The output is derived state, never persisted.
//!
//! Within a day, ordering is deterministic: category rank (calendar
//! entries before tasks before objectives), then all-day before timed,
//! then start time ascending, then title as the final tiebreak.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::colors::{self, ColorKey};
use crate::dates::{clock_minutes, parse_day};
use crate::error::StoreError;
use crate::holidays::{self, Holiday};
use crate::recurrence::base_event_id;
use crate::store::tasks::is_deadline_id;
use crate::store::LocalStore;
use crate::types::{EventType, LocalEvent, Objective, ObjectiveStatus, Task, TaskStatus};

/// Everything the projection reads, captured up front.
#[derive(Debug, Clone, Default)]
pub struct AgendaSnapshot {
    pub events: Vec<LocalEvent>,
    pub tasks: Vec<Task>,
    pub objectives: Vec<Objective>,
    pub holidays: Vec<Holiday>,
}

impl AgendaSnapshot {
    /// Capture the active user's data plus holidays for `current_year`
    /// and the year after, so year-end agendas have forward coverage.
    pub fn from_store(store: &LocalStore, current_year: i32) -> Result<Self, StoreError> {
        let mut holidays = holidays::generate(current_year);
        holidays.extend(holidays::generate(current_year + 1));
        Ok(Self {
            events: store.events()?,
            tasks: store.tasks()?,
            objectives: store.objectives()?,
            holidays,
        })
    }
}

/// Category toggles and search input. Holiday and birthday visibility are
/// independent of generic event visibility.
#[derive(Debug, Clone)]
pub struct AgendaFilters {
    pub selected_day: String,
    pub show_events: bool,
    pub show_birthdays: bool,
    pub show_holidays: bool,
    pub show_tasks: bool,
    pub show_objectives: bool,
    pub query: String,
}

impl AgendaFilters {
    /// Everything visible, no query, anchored on `day`.
    pub fn for_day(day: impl Into<String>) -> Self {
        Self {
            selected_day: day.into(),
            show_events: true,
            show_birthdays: true,
            show_holidays: true,
            show_tasks: true,
            show_objectives: true,
            query: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AgendaKind {
    Event,
    Birthday,
    Holiday,
    Task,
    Objective,
}

impl AgendaKind {
    /// Calendar entries sort ahead of tasks, tasks ahead of objectives.
    fn rank(&self) -> u8 {
        match self {
            Self::Event | Self::Birthday | Self::Holiday => 0,
            Self::Task => 1,
            Self::Objective => 2,
        }
    }
}

/// One row of the merged view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub id: String,
    pub kind: AgendaKind,
    pub title: String,
    pub day: String,
    pub all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    pub color: ColorKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Birthdays only: years since the birth year, clamped at zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Holidays only: the date came from a fallback approximation.
    pub approximate: bool,
}

/// Day-keyed buckets in calendar order.
pub type AgendaView = BTreeMap<String, Vec<AgendaItem>>;

fn matches_query(query: &str, title: &str, location: Option<&str>) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    if title.to_lowercase().contains(&needle) {
        return true;
    }
    location
        .map(|l| l.to_lowercase().contains(&needle))
        .unwrap_or(false)
}

/// Birth year for a birthday instance: the explicit field, else the base
/// instance's calendar year.
fn resolve_birth_year(event: &LocalEvent, all_events: &[LocalEvent]) -> Option<i32> {
    if let Some(year) = event.birth_year {
        return Some(year);
    }
    let base_id = base_event_id(&event.id);
    let base = all_events.iter().find(|e| e.id == base_id).unwrap_or(event);
    parse_day(&base.start_date).ok().map(|d| d.year())
}

fn event_item(event: &LocalEvent, kind: AgendaKind, age: Option<u32>, approximate: bool) -> AgendaItem {
    AgendaItem {
        id: event.id.clone(),
        kind,
        title: event.title.clone(),
        day: event.start_date.clone(),
        all_day: event.all_day,
        start_time: if event.all_day { None } else { event.start_time.clone() },
        color: colors::resolve(&event.color),
        location: event.location.clone(),
        age,
        approximate,
    }
}

/// Merge the snapshot into a day-bucketed, filtered, sorted view.
pub fn project(snapshot: &AgendaSnapshot, filters: &AgendaFilters) -> AgendaView {
    let mut items: Vec<AgendaItem> = Vec::new();

    for event in &snapshot.events {
        // The deadline projection is re-derived from tasks below; showing
        // the materialized entries too would double every deadline.
        if is_deadline_id(&event.id) {
            continue;
        }
        match event.event_type {
            EventType::Birthday => {
                if !filters.show_birthdays {
                    continue;
                }
                if !matches_query(&filters.query, &event.title, event.location.as_deref()) {
                    continue;
                }
                let age = resolve_birth_year(event, &snapshot.events).and_then(|birth| {
                    parse_day(&event.start_date)
                        .ok()
                        .map(|d| d.year().saturating_sub(birth).max(0) as u32)
                });
                items.push(event_item(event, AgendaKind::Birthday, age, false));
            }
            EventType::Event => {
                if !filters.show_events {
                    continue;
                }
                if !matches_query(&filters.query, &event.title, event.location.as_deref()) {
                    continue;
                }
                items.push(event_item(event, AgendaKind::Event, None, false));
            }
        }
    }

    if filters.show_holidays {
        for holiday in &snapshot.holidays {
            let event = &holiday.event;
            if !matches_query(&filters.query, &event.title, None) {
                continue;
            }
            items.push(event_item(event, AgendaKind::Holiday, None, holiday.approximate));
        }
    }

    if filters.show_tasks {
        for task in &snapshot.tasks {
            if task.status == TaskStatus::Completed {
                continue;
            }
            let Some(ref deadline) = task.deadline else {
                continue;
            };
            if !matches_query(&filters.query, &task.title, None) {
                continue;
            }
            let color = snapshot
                .objectives
                .iter()
                .find(|o| o.id == task.objective_id)
                .map(|o| colors::resolve(&o.color))
                .unwrap_or(colors::BASELINE);
            items.push(AgendaItem {
                id: task.id.clone(),
                kind: AgendaKind::Task,
                title: task.title.clone(),
                day: deadline.clone(),
                all_day: true,
                start_time: None,
                color,
                location: None,
                age: None,
                approximate: false,
            });
        }
    }

    if filters.show_objectives {
        for objective in &snapshot.objectives {
            if objective.status != ObjectiveStatus::Active {
                continue;
            }
            let Some(ref deadline) = objective.deadline else {
                continue;
            };
            if !matches_query(&filters.query, &objective.title, None) {
                continue;
            }
            items.push(AgendaItem {
                id: objective.id.clone(),
                kind: AgendaKind::Objective,
                title: objective.title.clone(),
                day: deadline.clone(),
                all_day: true,
                start_time: None,
                color: colors::resolve(&objective.color),
                location: None,
                age: None,
                approximate: false,
            });
        }
    }

    let mut view: AgendaView = BTreeMap::new();
    for item in items {
        view.entry(item.day.clone()).or_default().push(item);
    }

    for bucket in view.values_mut() {
        bucket.sort_by(|a, b| {
            let key = |i: &AgendaItem| {
                (
                    i.kind.rank(),
                    u8::from(!i.all_day),
                    i.start_time.as_deref().map(clock_minutes).unwrap_or(0),
                    i.title.to_lowercase(),
                )
            };
            key(a).cmp(&key(b))
        });
    }

    // The agenda always shows the selected day, even empty.
    view.entry(filters.selected_day.clone()).or_default();

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectiveCategory, Recurrence, Reminder};

    fn event(id: &str, title: &str, day: &str, start: Option<&str>) -> LocalEvent {
        LocalEvent {
            id: id.to_string(),
            title: title.to_string(),
            all_day: start.is_none(),
            start_date: day.to_string(),
            start_time: start.map(|s| s.to_string()),
            end_date: day.to_string(),
            end_time: start.map(|_| "23:00".to_string()),
            location: None,
            notes: None,
            color: "blue".to_string(),
            reminder: Reminder::None,
            recurrence: Recurrence::None,
            event_type: EventType::Event,
            birth_year: None,
        }
    }

    fn objective(id: &str, title: &str, color: &str, deadline: Option<&str>) -> Objective {
        Objective {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            category: ObjectiveCategory::Work,
            color: color.to_string(),
            deadline: deadline.map(|s| s.to_string()),
            created_at: "2026-08-01T09:00:00Z".to_string(),
            status: ObjectiveStatus::Active,
        }
    }

    fn task(id: &str, objective_id: &str, title: &str, deadline: &str) -> Task {
        Task {
            id: id.to_string(),
            objective_id: objective_id.to_string(),
            title: title.to_string(),
            description: None,
            deadline: Some(deadline.to_string()),
            importance: 2,
            status: TaskStatus::NotStarted,
            created_at: "2026-08-01T09:00:00Z".to_string(),
            completed_at: None,
        }
    }

    #[test]
    fn test_day_bucket_ordering_is_deterministic() {
        let snapshot = AgendaSnapshot {
            events: vec![
                event("e2", "Nine o'clock", "2026-08-10", Some("09:00")),
                event("e1", "All day", "2026-08-10", None),
                event("e3", "Eight o'clock", "2026-08-10", Some("08:00")),
            ],
            ..Default::default()
        };
        let view = project(&snapshot, &AgendaFilters::for_day("2026-08-10"));
        let bucket = &view["2026-08-10"];
        let ids: Vec<&str> = bucket.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e3", "e2"]);
    }

    #[test]
    fn test_title_is_final_tiebreak() {
        let snapshot = AgendaSnapshot {
            events: vec![
                event("eb", "Beta", "2026-08-10", Some("09:00")),
                event("ea", "alpha", "2026-08-10", Some("09:00")),
            ],
            ..Default::default()
        };
        let view = project(&snapshot, &AgendaFilters::for_day("2026-08-10"));
        let titles: Vec<&str> = view["2026-08-10"].iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["alpha", "Beta"]);
    }

    #[test]
    fn test_category_rank_events_tasks_objectives() {
        let snapshot = AgendaSnapshot {
            events: vec![event("e1", "Standup", "2026-08-10", Some("09:00"))],
            tasks: vec![task("t1", "o1", "Finish draft", "2026-08-10")],
            objectives: vec![objective("o1", "Ship v2", "green", Some("2026-08-10"))],
            ..Default::default()
        };
        let view = project(&snapshot, &AgendaFilters::for_day("2026-08-10"));
        let kinds: Vec<AgendaKind> = view["2026-08-10"].iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![AgendaKind::Event, AgendaKind::Task, AgendaKind::Objective]
        );
    }

    #[test]
    fn test_completed_tasks_are_excluded() {
        let mut done = task("t1", "o1", "Done already", "2026-08-10");
        done.status = TaskStatus::Completed;
        done.completed_at = Some("2026-08-09T12:00:00Z".to_string());
        let snapshot = AgendaSnapshot {
            tasks: vec![done, task("t2", "o1", "Still open", "2026-08-10")],
            objectives: vec![objective("o1", "Ship v2", "green", None)],
            ..Default::default()
        };
        let view = project(&snapshot, &AgendaFilters::for_day("2026-08-10"));
        let bucket = &view["2026-08-10"];
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].id, "t2");
    }

    #[test]
    fn test_task_color_resolution_chain() {
        let snapshot = AgendaSnapshot {
            tasks: vec![
                task("t1", "o-named", "Named", "2026-08-10"),
                task("t2", "o-hex", "Legacy hex", "2026-08-10"),
                task("t3", "o-missing", "Orphaned", "2026-08-10"),
                task("t4", "o-garbage", "Unparseable", "2026-08-10"),
            ],
            objectives: vec![
                objective("o-named", "A", "green", None),
                objective("o-hex", "B", "#ad1457", None),
                objective("o-garbage", "C", "mauve-ish", None),
            ],
            ..Default::default()
        };
        let view = project(&snapshot, &AgendaFilters::for_day("2026-08-10"));
        let color_of = |id: &str| {
            view["2026-08-10"]
                .iter()
                .find(|i| i.id == id)
                .unwrap()
                .color
        };
        assert_eq!(color_of("t1"), ColorKey::Green);
        assert_eq!(color_of("t2"), ColorKey::Pink);
        assert_eq!(color_of("t3"), colors::BASELINE);
        assert_eq!(color_of("t4"), colors::BASELINE);
    }

    #[test]
    fn test_query_matches_title_and_location() {
        let mut located = event("e1", "Sync", "2026-08-10", Some("09:00"));
        located.location = Some("Blue Room".to_string());
        let snapshot = AgendaSnapshot {
            events: vec![located, event("e2", "Retro", "2026-08-10", Some("10:00"))],
            tasks: vec![task("t1", "o1", "Paint the fence", "2026-08-10")],
            ..Default::default()
        };

        let mut filters = AgendaFilters::for_day("2026-08-10");
        filters.query = "blue".to_string();
        let view = project(&snapshot, &filters);
        let ids: Vec<&str> = view["2026-08-10"].iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["e1"], "location matches, case-insensitive");

        filters.query = "PAINT".to_string();
        let view = project(&snapshot, &filters);
        let ids: Vec<&str> = view["2026-08-10"].iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["t1"]);
    }

    #[test]
    fn test_holiday_and_birthday_toggles_are_independent() {
        let mut bday = event("b1", "Ada's birthday", "2026-03-15", None);
        bday.event_type = EventType::Birthday;
        bday.birth_year = Some(2000);
        let snapshot = AgendaSnapshot {
            events: vec![bday, event("e1", "Plain", "2026-03-15", Some("09:00"))],
            holidays: holidays::generate(2026),
            ..Default::default()
        };

        let mut filters = AgendaFilters::for_day("2026-03-15");
        filters.show_events = false;
        let view = project(&snapshot, &filters);
        assert!(view["2026-03-15"].iter().any(|i| i.kind == AgendaKind::Birthday));
        assert!(!view["2026-03-15"].iter().any(|i| i.kind == AgendaKind::Event));
        assert!(view.contains_key("2026-12-25"), "holidays still visible");

        filters.show_holidays = false;
        filters.show_birthdays = false;
        let view = project(&snapshot, &filters);
        assert!(!view.contains_key("2026-12-25"));
        assert!(view["2026-03-15"].is_empty());
    }

    #[test]
    fn test_empty_selected_day_is_retained() {
        let snapshot = AgendaSnapshot::default();
        let mut filters = AgendaFilters::for_day("2026-08-10");
        filters.show_holidays = false;
        let view = project(&snapshot, &filters);
        assert_eq!(view.len(), 1);
        assert!(view["2026-08-10"].is_empty());
    }

    #[test]
    fn test_deadline_derived_events_do_not_double_tasks() {
        let mut derived = event("deadline_t1", "Finish draft", "2026-08-10", None);
        derived.color = "green".to_string();
        let snapshot = AgendaSnapshot {
            events: vec![derived],
            tasks: vec![task("t1", "o1", "Finish draft", "2026-08-10")],
            objectives: vec![objective("o1", "Ship v2", "green", None)],
            ..Default::default()
        };
        let view = project(&snapshot, &AgendaFilters::for_day("2026-08-10"));
        let bucket = &view["2026-08-10"];
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].kind, AgendaKind::Task);
    }

    #[test]
    fn test_birthday_ages_increase_across_instances() {
        // A year-2000 birthday expanded across three instances.
        let base = {
            let mut b = event("bday", "Ada's birthday", "2000-03-15", None);
            b.event_type = EventType::Birthday;
            b.birth_year = Some(2000);
            b.recurrence = Recurrence::Yearly;
            b
        };
        let family =
            crate::recurrence::expand(&base, Recurrence::Yearly, 3).expect("expand birthday");
        let snapshot = AgendaSnapshot {
            events: family,
            ..Default::default()
        };
        let mut filters = AgendaFilters::for_day("2000-03-15");
        filters.show_holidays = false;
        let view = project(&snapshot, &filters);

        let ages: Vec<u32> = ["2000-03-15", "2001-03-15", "2002-03-15"]
            .iter()
            .map(|day| view[*day][0].age.unwrap())
            .collect();
        assert_eq!(ages, vec![0, 1, 2]);
    }

    #[test]
    fn test_birthday_age_falls_back_to_base_year() {
        // No explicit birth year: the base instance's year stands in.
        let base = {
            let mut b = event("bday", "Ada's birthday", "1990-06-01", None);
            b.event_type = EventType::Birthday;
            b.recurrence = Recurrence::Yearly;
            b
        };
        let family =
            crate::recurrence::expand(&base, Recurrence::Yearly, 2).expect("expand birthday");
        let snapshot = AgendaSnapshot {
            events: family,
            ..Default::default()
        };
        let mut filters = AgendaFilters::for_day("1991-06-01");
        filters.show_holidays = false;
        let view = project(&snapshot, &filters);
        assert_eq!(view["1991-06-01"][0].age, Some(1));
    }
}
