//! Typed calendar event helpers.
//!
//! Recurring series are materialized at write time: the stored collection
//! holds the base record plus its `<baseId>_r<index>` siblings. Editing or
//! deleting any member removes the whole family before reinsertion, so a
//! series can never end up half-updated.

use uuid::Uuid;

use super::tasks::is_deadline_id;
use super::LocalStore;
use crate::dates::{day_cmp, parse_clock, parse_day};
use crate::error::StoreError;
use crate::holidays::is_holiday_id;
use crate::recurrence::{base_event_id, effective_rule, expand, instance_count_for, ExpandOptions};
use crate::types::{Collection, EventType, LocalEvent, Recurrence};

fn validate_event(event: &LocalEvent) -> Result<(), StoreError> {
    parse_day(&event.start_date)?;
    parse_day(&event.end_date)?;
    if day_cmp(&event.end_date, &event.start_date) == std::cmp::Ordering::Less {
        return Err(StoreError::InvalidEventRange {
            start: event.start_date.clone(),
            end: event.end_date.clone(),
        });
    }

    if !event.all_day {
        let start = event
            .start_time
            .as_deref()
            .ok_or_else(|| StoreError::InvalidTimeRange {
                start: String::new(),
                end: String::new(),
            })?;
        let end = event
            .end_time
            .as_deref()
            .ok_or_else(|| StoreError::InvalidTimeRange {
                start: start.to_string(),
                end: String::new(),
            })?;
        let start_t = parse_clock(start)?;
        let end_t = parse_clock(end)?;
        if event.start_date == event.end_date && end_t <= start_t {
            return Err(StoreError::InvalidTimeRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
    }
    Ok(())
}

fn reject_reserved(id: &str) -> Result<(), StoreError> {
    if is_holiday_id(id) || is_deadline_id(id) {
        return Err(StoreError::ReservedId(id.to_string()));
    }
    Ok(())
}

impl LocalStore {
    /// All stored calendar events for the active user (bases and siblings;
    /// holidays are never among them).
    pub fn events(&self) -> Result<Vec<LocalEvent>, StoreError> {
        self.read_collection(Collection::Events)
    }

    /// Create an event with the default expansion bounds.
    pub fn add_event(&self, draft: LocalEvent) -> Result<Option<Vec<LocalEvent>>, StoreError> {
        self.add_event_with(draft, &ExpandOptions::default())
    }

    /// Create an event, materializing its recurring series. Returns the
    /// stored family (base first). No-op (returning `None`) when signed
    /// out. A birthday with any cadence other than yearly is rejected; the
    /// edit flow owns surfacing that to the user.
    pub fn add_event_with(
        &self,
        mut draft: LocalEvent,
        opts: &ExpandOptions,
    ) -> Result<Option<Vec<LocalEvent>>, StoreError> {
        if self.active_user().is_none() {
            return Ok(None);
        }
        if draft.id.is_empty() {
            draft.id = Uuid::new_v4().to_string();
        }
        reject_reserved(&draft.id)?;
        if draft.event_type == EventType::Birthday && draft.recurrence != Recurrence::Yearly {
            return Err(StoreError::InvalidBirthdayRule);
        }
        validate_event(&draft)?;

        let rule = effective_rule(&draft);
        let count = instance_count_for(&draft, rule, opts);
        let family = expand(&draft, rule, count)?;

        let mut events = self.events()?;
        events.extend(family.iter().cloned());
        self.write_collection(Collection::Events, &events)?;
        Ok(Some(family))
    }

    /// Replace a recurring family with a freshly expanded series built
    /// from the edited record. The edited id may be the base or any
    /// sibling; every event sharing its base identifier is removed first.
    /// Editing a birthday forces yearly cadence regardless of prior state.
    pub fn update_event(
        &self,
        mut edited: LocalEvent,
        opts: &ExpandOptions,
    ) -> Result<Option<Vec<LocalEvent>>, StoreError> {
        if self.active_user().is_none() {
            return Ok(None);
        }
        reject_reserved(&edited.id)?;
        if edited.event_type == EventType::Birthday {
            edited.recurrence = Recurrence::Yearly;
        }
        validate_event(&edited)?;

        let base = base_event_id(&edited.id).to_string();
        let rule = effective_rule(&edited);
        let count = instance_count_for(&edited, rule, opts);
        let family = expand(&edited, rule, count)?;

        let mut events = self.events()?;
        events.retain(|e| base_event_id(&e.id) != base);
        events.extend(family.iter().cloned());
        self.write_collection(Collection::Events, &events)?;
        Ok(Some(family))
    }

    /// Delete an event family. The id may be the base or any sibling.
    pub fn delete_event(&self, id: &str) -> Result<(), StoreError> {
        reject_reserved(id)?;
        let base = base_event_id(id).to_string();
        let mut events = self.events()?;
        let before = events.len();
        events.retain(|e| base_event_id(&e.id) != base);
        if events.len() == before {
            return Ok(());
        }
        self.write_collection(Collection::Events, &events)
    }
}
