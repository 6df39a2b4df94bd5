//! Recurrence expansion for repeating calendar items.
//!
//! Recurring series are materialized up front: `expand` returns the base
//! record followed by derived instances whose ids follow the public
//! `<baseId>_r<index>` contract. That encoding is the only mechanism by
//! which the aggregator and the edit flow recognize a recurring family —
//! editing or deleting any member regroups every sibling sharing the base
//! identifier.

use crate::dates::{add_months_clamped, add_years_clamped, format_day, parse_day};
use crate::error::DateError;
use crate::types::{EventType, LocalEvent, Recurrence};

/// How far series are expanded.
///
/// The non-birthday bound is deliberately a parameter, not an inferred
/// constant: callers that page further into the future re-expand with a
/// larger count. Birthdays expand by calendar years so the agenda has
/// coverage decades ahead.
#[derive(Debug, Clone, Copy)]
pub struct ExpandOptions {
    /// Total instances (including the base) for daily/weekly/monthly series.
    pub instance_count: usize,
    /// Total yearly instances (including the base) for birthdays.
    pub birthday_years: usize,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            instance_count: 24,
            birthday_years: 50,
        }
    }
}

/// Strip the `_r<index>` suffix, yielding the family's base identifier.
/// Ids without the suffix are their own base.
pub fn base_event_id(id: &str) -> &str {
    if let Some(pos) = id.rfind("_r") {
        let tail = &id[pos + 2..];
        if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
            return &id[..pos];
        }
    }
    id
}

/// Instance index encoded in an id, if any. The base record has none.
pub fn instance_index(id: &str) -> Option<usize> {
    let base = base_event_id(id);
    if base.len() == id.len() {
        return None;
    }
    id[base.len() + 2..].parse().ok()
}

/// The recurrence rule a record is allowed to carry. Birthdays are pinned
/// to yearly regardless of what the caller asked for.
pub fn effective_rule(event: &LocalEvent) -> Recurrence {
    if event.event_type == EventType::Birthday {
        Recurrence::Yearly
    } else {
        event.recurrence
    }
}

/// Instance count for a rule under the given options.
pub fn instance_count_for(event: &LocalEvent, rule: Recurrence, opts: &ExpandOptions) -> usize {
    match rule {
        Recurrence::None => 1,
        Recurrence::Yearly if event.event_type == EventType::Birthday => opts.birthday_years,
        _ => opts.instance_count,
    }
}

/// Materialize a recurring series: the base record first, then `count - 1`
/// derived instances.
///
/// Daily/weekly add a fixed day offset to both ends, preserving the
/// time-of-day and the start-to-end day span. Monthly advances the month
/// with the day-of-month clamped to the target month's length; yearly
/// advances the year the same way. Each derived instance carries
/// `<baseId>_r<index>`.
pub fn expand(base: &LocalEvent, rule: Recurrence, count: usize) -> Result<Vec<LocalEvent>, DateError> {
    let base_id = base_event_id(&base.id).to_string();

    let mut series = Vec::with_capacity(count.max(1));
    let mut first = base.clone();
    first.id = base_id.clone();
    series.push(first);

    if rule == Recurrence::None || count <= 1 {
        return Ok(series);
    }

    let start = parse_day(&base.start_date)?;
    let end = parse_day(&base.end_date)?;
    let span = end - start;

    for index in 1..count {
        let i = index as i32;
        let next_start = match rule {
            Recurrence::None => unreachable!("handled above"),
            Recurrence::Daily => start + chrono::Duration::days(index as i64),
            Recurrence::Weekly => start + chrono::Duration::days(7 * index as i64),
            Recurrence::Monthly => add_months_clamped(start, i),
            Recurrence::Yearly => add_years_clamped(start, i),
        };
        let mut instance = base.clone();
        instance.id = format!("{base_id}_r{index}");
        instance.start_date = format_day(next_start);
        instance.end_date = format_day(next_start + span);
        series.push(instance);
    }

    Ok(series)
}
