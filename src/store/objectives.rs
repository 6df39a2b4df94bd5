//! Typed objective helpers.

use chrono::Utc;
use uuid::Uuid;

use super::LocalStore;
use crate::dates::parse_day;
use crate::error::StoreError;
use crate::types::{Collection, Objective, ObjectivePatch, Task};

impl LocalStore {
    /// All objectives for the active user.
    pub fn objectives(&self) -> Result<Vec<Objective>, StoreError> {
        self.read_collection(Collection::Objectives)
    }

    /// Create an objective. A blank id or timestamp is filled in; the
    /// record is returned as stored. No-op (returning `None`) when signed
    /// out.
    pub fn add_objective(&self, mut draft: Objective) -> Result<Option<Objective>, StoreError> {
        if self.active_user().is_none() {
            return Ok(None);
        }
        if let Some(ref deadline) = draft.deadline {
            parse_day(deadline)?;
        }
        if draft.id.is_empty() {
            draft.id = Uuid::new_v4().to_string();
        }
        if draft.created_at.is_empty() {
            draft.created_at = Utc::now().to_rfc3339();
        }

        let mut objectives = self.objectives()?;
        objectives.push(draft.clone());
        self.write_collection(Collection::Objectives, &objectives)?;
        Ok(Some(draft))
    }

    /// Apply a partial patch by identifier. Patching an unknown id is a
    /// no-op, not an error.
    pub fn update_objective(&self, id: &str, patch: ObjectivePatch) -> Result<(), StoreError> {
        if let Some(Some(ref deadline)) = patch.deadline {
            parse_day(deadline)?;
        }

        let mut objectives = self.objectives()?;
        let Some(objective) = objectives.iter_mut().find(|o| o.id == id) else {
            return Ok(());
        };

        if let Some(title) = patch.title {
            objective.title = title;
        }
        if let Some(description) = patch.description {
            objective.description = description;
        }
        if let Some(category) = patch.category {
            objective.category = category;
        }
        if let Some(color) = patch.color {
            objective.color = color;
        }
        if let Some(deadline) = patch.deadline {
            objective.deadline = deadline;
        }
        if let Some(status) = patch.status {
            objective.status = status;
        }

        self.write_collection(Collection::Objectives, &objectives)?;
        // Derived calendar entries borrow the parent's color.
        self.regenerate_deadline_events()
    }

    /// Delete an objective and cascade to its tasks, so no orphan
    /// `objectiveId` survives.
    pub fn delete_objective(&self, id: &str) -> Result<(), StoreError> {
        let mut objectives = self.objectives()?;
        let before = objectives.len();
        objectives.retain(|o| o.id != id);
        if objectives.len() == before {
            return Ok(());
        }
        self.write_collection(Collection::Objectives, &objectives)?;

        let mut tasks: Vec<Task> = self.read_collection(Collection::Tasks)?;
        tasks.retain(|t| t.objective_id != id);
        self.write_collection(Collection::Tasks, &tasks)?;

        self.regenerate_deadline_events()
    }
}
