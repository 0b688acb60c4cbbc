use std::collections::HashSet;

use anyhow::Result;
use eventcal_core::{Event, EventFormData, EventStore};
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize, render_conflicts};

/// Conflicts are listed in full for up to this many instances, then summarized.
const COMPACT_THRESHOLD: usize = 3;

pub fn run(store: &mut EventStore, form: EventFormData) -> Result<()> {
    let added = store.add(form)?;

    let Some(base) = added.first() else {
        return Ok(());
    };

    println!("{}", format!("  Created: {}", base.title).green());
    println!("   {}", base.render());
    if added.len() > 1 {
        let generated = added.len() - 1;
        println!(
            "   {}",
            format!("+ {} recurring {}", generated, pluralize("instance", generated)).dimmed()
        );
    }

    report_conflicts(store, &added);

    Ok(())
}

/// Warn about stored events overlapping any newly added event.
fn report_conflicts(store: &EventStore, added: &[Event]) {
    let clashes = find_clashes(store, added);
    if clashes.is_empty() {
        return;
    }

    let (shown, rest) = compact(&clashes);
    println!();
    for (event, others) in shown {
        println!("{}", render_conflicts(event, others));
    }
    if rest > 0 {
        println!(
            "  {}",
            format!("…and {} more overlapping {}", rest, pluralize("instance", rest)).yellow()
        );
    }
}

/// Newly added events paired with the stored events they overlap.
///
/// Overlaps within the new series itself are not reported.
fn find_clashes<'a>(store: &'a EventStore, added: &'a [Event]) -> Vec<(&'a Event, Vec<&'a Event>)> {
    let own_ids: HashSet<&str> = added.iter().map(|e| e.id.as_str()).collect();

    added
        .iter()
        .map(|event| {
            let others = store
                .query_conflicts(event)
                .into_iter()
                .filter(|other| !own_ids.contains(other.id.as_str()))
                .collect::<Vec<_>>();
            (event, others)
        })
        .filter(|(_, others)| !others.is_empty())
        .collect()
}

/// The items listed in full, and how many are left to summarize.
fn compact<T>(items: &[T]) -> (&[T], usize) {
    let shown = items.len().min(COMPACT_THRESHOLD);
    (&items[..shown], items.len() - shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use eventcal_core::{RecurrenceKind, RecurrencePattern};

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn form(title: &str, start: NaiveDateTime, hours: i64) -> EventFormData {
        EventFormData {
            title: title.to_string(),
            description: String::new(),
            start_time: start,
            end_time: start + Duration::hours(hours),
            color: "#3B82F6".to_string(),
            category: None,
            is_recurring: false,
            recurrence: None,
        }
    }

    #[test]
    fn own_series_overlaps_are_not_reported() {
        let mut store = EventStore::new();
        store.add_at(form("Dentist", at(3, 10), 1), at(1, 0)).unwrap();

        // 36h blocks every day overlap each other and the dentist on the 3rd.
        let mut shift = form("Shift", at(1, 8), 36);
        let mut pattern = RecurrencePattern::new(RecurrenceKind::Daily, 1);
        pattern.end_date = NaiveDate::from_ymd_opt(2024, 1, 4);
        shift.is_recurring = true;
        shift.recurrence = Some(pattern);
        let added = store.add_at(shift, at(1, 0)).unwrap();
        assert_eq!(added.len(), 4);

        let clashes = find_clashes(&store, &added);

        assert_eq!(clashes.len(), 2);
        for (event, others) in &clashes {
            assert_eq!(event.title, "Shift");
            assert_eq!(others.len(), 1);
            assert_eq!(others[0].title, "Dentist");
        }
    }

    #[test]
    fn no_clashes_for_free_slot() {
        let mut store = EventStore::new();
        store.add_at(form("Dentist", at(3, 10), 1), at(1, 0)).unwrap();
        let added = store.add_at(form("Lunch", at(3, 12), 1), at(1, 0)).unwrap();

        assert!(find_clashes(&store, &added).is_empty());
    }

    #[test]
    fn compact_lists_first_few_then_counts() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(compact(&items), (&items[..3], 2));
        assert_eq!(compact(&items[..2]), (&items[..2], 0));
    }
}
