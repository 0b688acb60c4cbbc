use anyhow::Result;
use dialoguer::Confirm;
use eventcal_core::{CalendarError, DeletionScope, EventStore};
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize};

/// Delete an event. Returns whether anything was removed.
///
/// Deleting the head of a recurring series takes all its instances with it,
/// so that case asks for confirmation unless `force` is set.
pub fn run(store: &mut EventStore, id: &str, force: bool) -> Result<bool> {
    let event = store
        .get(id)
        .ok_or_else(|| CalendarError::NotFound(id.to_string()))?;

    if DeletionScope::of(event) == DeletionScope::Series && !force {
        let series_len = series_len(store, id);

        println!("   {}", event.render());
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete the whole series ({} {})?",
                series_len,
                pluralize("event", series_len)
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "  Nothing deleted".dimmed());
            return Ok(false);
        }
    }

    let removed = store.delete(id)?;
    let title = removed.first().map(|e| e.title.as_str()).unwrap_or(id);

    println!(
        "{}",
        format!(
            "  Deleted: {} ({} {})",
            title,
            removed.len(),
            pluralize("event", removed.len())
        )
        .red()
    );

    Ok(true)
}

/// Number of stored events in the series headed by `id`, the head included.
fn series_len(store: &EventStore, id: &str) -> usize {
    store
        .events()
        .iter()
        .filter(|e| e.id == id || e.parent_event_id.as_deref() == Some(id))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use eventcal_core::{EventFormData, RecurrenceKind, RecurrencePattern};

    #[test]
    fn series_len_counts_head_and_instances() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut pattern = RecurrencePattern::new(RecurrenceKind::Daily, 1);
        pattern.end_date = NaiveDate::from_ymd_opt(2024, 1, 5);
        let form = EventFormData {
            title: "Standup".to_string(),
            description: String::new(),
            start_time: start,
            end_time: start + Duration::minutes(15),
            color: "#3B82F6".to_string(),
            category: None,
            is_recurring: true,
            recurrence: Some(pattern),
        };

        let mut store = EventStore::new();
        let added = store.add_at(form, start).unwrap();
        let head = added[0].id.clone();
        let instance = added[2].id.clone();

        assert_eq!(series_len(&store, &head), 5);
        assert_eq!(DeletionScope::of(store.get(&head).unwrap()), DeletionScope::Series);
        assert_eq!(
            DeletionScope::of(store.get(&instance).unwrap()),
            DeletionScope::Instance
        );
    }
}
