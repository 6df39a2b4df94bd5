//! Typed task helpers and the deadline-derived calendar projection.
//!
//! Tasks with a deadline materialize an all-day calendar entry under the
//! reserved `deadline_` prefix. Every task or objective mutation
//! regenerates exactly those entries, leaving manually created events
//! untouched — the agenda stays current without the aggregator having to
//! join collections at render time.

use chrono::Utc;
use uuid::Uuid;

use super::LocalStore;
use crate::dates::parse_day;
use crate::error::StoreError;
use crate::types::{
    Collection, EventType, LocalEvent, Objective, Recurrence, Reminder, Task, TaskPatch,
    TaskStatus,
};

/// Reserved id prefix for task-deadline calendar entries.
pub const DEADLINE_PREFIX: &str = "deadline_";

/// Whether an event id belongs to the deadline projection.
pub fn is_deadline_id(id: &str) -> bool {
    id.starts_with(DEADLINE_PREFIX)
}

fn validate_importance(importance: u8) -> Result<(), StoreError> {
    if (1..=4).contains(&importance) {
        return Ok(());
    }
    Err(StoreError::InvalidImportance(importance))
}

/// Keep `completed_at` and `status` in lockstep:
/// `completed_at.is_some() == (status == Completed)`.
fn enforce_completion_invariant(task: &mut Task) {
    match task.status {
        TaskStatus::Completed => {
            if task.completed_at.is_none() {
                task.completed_at = Some(Utc::now().to_rfc3339());
            }
        }
        _ => task.completed_at = None,
    }
}

impl LocalStore {
    /// All tasks for the active user.
    pub fn tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.read_collection(Collection::Tasks)
    }

    /// Create a task. The parent objective must exist; a blank id or
    /// timestamp is filled in. No-op (returning `None`) when signed out.
    pub fn add_task(&self, mut draft: Task) -> Result<Option<Task>, StoreError> {
        if self.active_user().is_none() {
            return Ok(None);
        }
        validate_importance(draft.importance)?;
        if let Some(ref deadline) = draft.deadline {
            parse_day(deadline)?;
        }

        let objectives: Vec<Objective> = self.read_collection(Collection::Objectives)?;
        if !objectives.iter().any(|o| o.id == draft.objective_id) {
            return Err(StoreError::UnknownObjective(draft.objective_id));
        }

        if draft.id.is_empty() {
            draft.id = Uuid::new_v4().to_string();
        }
        if draft.created_at.is_empty() {
            draft.created_at = Utc::now().to_rfc3339();
        }
        enforce_completion_invariant(&mut draft);

        let mut tasks = self.tasks()?;
        tasks.push(draft.clone());
        self.write_collection(Collection::Tasks, &tasks)?;
        self.regenerate_deadline_events()?;
        Ok(Some(draft))
    }

    /// Apply a partial patch by identifier. Patching an unknown id is a
    /// no-op, not an error. Status flips set or clear `completed_at`
    /// atomically with the same write.
    pub fn update_task(&self, id: &str, patch: TaskPatch) -> Result<(), StoreError> {
        if let Some(importance) = patch.importance {
            validate_importance(importance)?;
        }
        if let Some(Some(ref deadline)) = patch.deadline {
            parse_day(deadline)?;
        }

        let mut tasks = self.tasks()?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(());
        };

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(deadline) = patch.deadline {
            task.deadline = deadline;
        }
        if let Some(importance) = patch.importance {
            task.importance = importance;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        enforce_completion_invariant(task);

        self.write_collection(Collection::Tasks, &tasks)?;
        self.regenerate_deadline_events()
    }

    /// Delete a task by identifier.
    pub fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        let mut tasks = self.tasks()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(());
        }
        self.write_collection(Collection::Tasks, &tasks)?;
        self.regenerate_deadline_events()
    }

    /// Rebuild the deadline-derived calendar entries from the current task
    /// set. Replaces only `deadline_`-prefixed entries; everything else in
    /// the events collection is preserved.
    pub(crate) fn regenerate_deadline_events(&self) -> Result<(), StoreError> {
        if self.active_user().is_none() {
            return Ok(());
        }
        let tasks = self.tasks()?;
        let objectives: Vec<Objective> = self.read_collection(Collection::Objectives)?;

        let mut events: Vec<LocalEvent> = self.read_collection(Collection::Events)?;
        events.retain(|e| !is_deadline_id(&e.id));

        for task in &tasks {
            if task.status == TaskStatus::Completed {
                continue;
            }
            let Some(ref deadline) = task.deadline else {
                continue;
            };
            let color = objectives
                .iter()
                .find(|o| o.id == task.objective_id)
                .map(|o| o.color.clone())
                .unwrap_or_default();
            events.push(LocalEvent {
                id: format!("{DEADLINE_PREFIX}{}", task.id),
                title: task.title.clone(),
                all_day: true,
                start_date: deadline.clone(),
                start_time: None,
                end_date: deadline.clone(),
                end_time: None,
                location: None,
                notes: None,
                color,
                reminder: Reminder::None,
                recurrence: Recurrence::None,
                event_type: EventType::Event,
                birth_year: None,
            });
        }

        self.write_collection(Collection::Events, &events)
    }
}
