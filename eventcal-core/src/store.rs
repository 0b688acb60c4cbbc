//! In-memory event collection and its operations.
//!
//! The store is the single writer for a session's events. Recurring events are
//! expanded once on [`EventStore::add`] and stored as concrete instances;
//! later edits act on individual records.

use std::path::Path;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::conflict::find_conflicts;
use crate::error::{CalendarError, CalendarResult};
use crate::event::{Event, EventFormData, EventUpdate};
use crate::persist;
use crate::recurrence;

/// Which events a delete removes, inferred from the target's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionScope {
    /// A plain event: only itself.
    Single,
    /// A recurring base event: itself and every instance generated from it.
    Series,
    /// A generated instance: only itself, siblings stay.
    Instance,
}

impl DeletionScope {
    pub fn of(event: &Event) -> Self {
        if event.is_instance() {
            DeletionScope::Instance
        } else if event.is_recurring {
            DeletionScope::Series
        } else {
            DeletionScope::Single
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        EventStore { events }
    }

    /// Load the store from a JSON file. A missing file gives an empty store.
    pub fn open(path: &Path) -> CalendarResult<Self> {
        Ok(Self::from_events(persist::load_events(path)?))
    }

    pub fn save(&self, path: &Path) -> CalendarResult<()> {
        persist::save_events(path, &self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    fn position(&self, id: &str) -> CalendarResult<usize> {
        self.events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CalendarError::NotFound(id.to_string()))
    }

    /// Create an event from form data, expanding it if it recurs.
    ///
    /// Returns the events that were appended: the new event first, followed
    /// by its generated instances.
    pub fn add(&mut self, form: EventFormData) -> CalendarResult<Vec<Event>> {
        self.add_at(form, Local::now().naive_local())
    }

    /// [`EventStore::add`] with an explicit generation time for the default
    /// recurrence horizon.
    pub fn add_at(
        &mut self,
        form: EventFormData,
        generated_at: NaiveDateTime,
    ) -> CalendarResult<Vec<Event>> {
        let event = Event::from_form(Uuid::new_v4().to_string(), form);
        event.validate()?;

        let added = recurrence::expand(&event, generated_at)?;
        tracing::debug!(event_id = %event.id, count = added.len(), "Adding events");

        self.events.extend(added.iter().cloned());
        Ok(added)
    }

    /// Merge partial form data into the event with this id.
    ///
    /// The merged event is validated before it replaces the stored one.
    pub fn update(&mut self, id: &str, update: EventUpdate) -> CalendarResult<&Event> {
        let index = self.position(id)?;

        let mut updated = self.events[index].clone();
        updated.apply(update);
        updated.validate()?;

        tracing::debug!(event_id = %id, "Updating event");
        self.events[index] = updated;
        Ok(&self.events[index])
    }

    /// Move an event to another day, keeping its start time and duration.
    ///
    /// Fails with `InvalidTimeRange` if the moved end is out of range; the
    /// event is left as it was.
    pub fn move_event(&mut self, id: &str, date: NaiveDate) -> CalendarResult<&Event> {
        let index = self.position(id)?;
        let event = &mut self.events[index];

        let start_time = date.and_time(event.start_time.time());
        let end_time = start_time
            .checked_add_signed(event.duration())
            .ok_or(CalendarError::InvalidTimeRange {
                start: start_time,
                end: NaiveDateTime::MAX,
            })?;
        event.start_time = start_time;
        event.end_time = end_time;

        tracing::debug!(event_id = %id, %date, "Moved event");
        Ok(&self.events[index])
    }

    /// Delete the event with this id, plus its instances if it heads a series.
    ///
    /// Returns the removed events in their stored order.
    pub fn delete(&mut self, id: &str) -> CalendarResult<Vec<Event>> {
        let index = self.position(id)?;
        let scope = DeletionScope::of(&self.events[index]);

        let (removed, kept): (Vec<Event>, Vec<Event>) =
            std::mem::take(&mut self.events)
                .into_iter()
                .partition(|event| match scope {
                    DeletionScope::Series => {
                        event.id == id || event.parent_event_id.as_deref() == Some(id)
                    }
                    DeletionScope::Single | DeletionScope::Instance => event.id == id,
                });
        self.events = kept;

        tracing::debug!(event_id = %id, ?scope, count = removed.len(), "Deleted events");
        Ok(removed)
    }

    /// Events starting on the given day.
    pub fn query_by_date(&self, date: NaiveDate) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.start_time.date() == date)
            .collect()
    }

    /// Events starting in the given month, ordered by start time.
    pub fn query_month(&self, year: i32, month: u32) -> Vec<&Event> {
        let mut events: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| e.start_time.year() == year && e.start_time.month() == month)
            .collect();
        events.sort_by_key(|e| e.start_time);
        events
    }

    /// Stored events that overlap `candidate`.
    pub fn query_conflicts(&self, candidate: &Event) -> Vec<&Event> {
        find_conflicts(candidate, &self.events)
    }

    /// Case-insensitive substring match on title or description.
    pub fn search(&self, query: &str) -> Vec<&Event> {
        let query = query.to_lowercase();
        self.events
            .iter()
            .filter(|e| {
                e.title.to_lowercase().contains(&query)
                    || e.description.to_lowercase().contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::{RecurrenceKind, RecurrencePattern};
    use chrono::Duration;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn form(title: &str, start: NaiveDateTime, minutes: i64) -> EventFormData {
        EventFormData {
            title: title.to_string(),
            description: String::new(),
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            color: "#3B82F6".to_string(),
            category: None,
            is_recurring: false,
            recurrence: None,
        }
    }

    fn recurring_form(title: &str, start: NaiveDateTime, end_date: NaiveDate) -> EventFormData {
        let mut pattern = RecurrencePattern::new(RecurrenceKind::Daily, 1);
        pattern.end_date = Some(end_date);
        EventFormData {
            is_recurring: true,
            recurrence: Some(pattern),
            ..form(title, start, 60)
        }
    }

    fn generated_at() -> NaiveDateTime {
        at(2024, 1, 1, 0, 0)
    }

    #[test]
    fn add_plain_event() {
        let mut store = EventStore::new();
        let added = store
            .add_at(form("Dentist", at(2024, 1, 10, 14, 0), 30), generated_at())
            .unwrap();

        assert_eq!(added.len(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&added[0].id).unwrap().title, "Dentist");
    }

    #[test]
    fn add_recurring_event_appends_series() {
        let mut store = EventStore::new();
        store
            .add_at(form("Other", at(2024, 1, 1, 8, 0), 30), generated_at())
            .unwrap();
        let added = store
            .add_at(
                recurring_form("Standup", at(2024, 1, 1, 9, 0), NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()),
                generated_at(),
            )
            .unwrap();

        assert_eq!(added.len(), 4);
        assert_eq!(store.len(), 5);
        assert_eq!(store.events()[1].id, added[0].id);
        assert!(added[1..]
            .iter()
            .all(|e| e.parent_event_id.as_deref() == Some(added[0].id.as_str())));
    }

    #[test]
    fn add_rejects_invalid_input() {
        let mut store = EventStore::new();

        let mut backwards = form("Backwards", at(2024, 1, 1, 9, 0), 60);
        backwards.end_time = at(2024, 1, 1, 8, 0);
        assert!(matches!(
            store.add_at(backwards, generated_at()),
            Err(CalendarError::InvalidTimeRange { .. })
        ));

        let mut zero = recurring_form("Zero", at(2024, 1, 1, 9, 0), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        zero.recurrence.as_mut().unwrap().interval = 0;
        assert!(matches!(
            store.add_at(zero, generated_at()),
            Err(CalendarError::InvalidRecurrenceRule(_))
        ));

        assert!(store.is_empty());
    }

    #[test]
    fn update_merges_fields() {
        let mut store = EventStore::new();
        let id = store
            .add_at(form("Lunch", at(2024, 1, 2, 12, 0), 60), generated_at())
            .unwrap()[0]
            .id
            .clone();

        let updated = store
            .update(
                &id,
                EventUpdate {
                    title: Some("Team lunch".to_string()),
                    end_time: Some(at(2024, 1, 2, 13, 30)),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Team lunch");
        assert_eq!(updated.duration(), Duration::minutes(90));
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = EventStore::new();
        assert!(matches!(
            store.update("missing", EventUpdate::default()),
            Err(CalendarError::NotFound(_))
        ));
    }

    #[test]
    fn update_rejecting_merge_leaves_event_untouched() {
        let mut store = EventStore::new();
        let id = store
            .add_at(form("Lunch", at(2024, 1, 2, 12, 0), 60), generated_at())
            .unwrap()[0]
            .id
            .clone();

        let result = store.update(
            &id,
            EventUpdate {
                end_time: Some(at(2024, 1, 2, 11, 0)),
                ..Default::default()
            },
        );

        assert!(result.is_err());
        assert_eq!(store.get(&id).unwrap().end_time, at(2024, 1, 2, 13, 0));
    }

    #[test]
    fn move_keeps_time_of_day_and_duration() {
        let mut store = EventStore::new();
        let id = store
            .add_at(form("Late show", at(2024, 1, 5, 23, 0), 120), generated_at())
            .unwrap()[0]
            .id
            .clone();

        let moved = store
            .move_event(&id, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap())
            .unwrap();

        assert_eq!(moved.start_time, at(2024, 1, 9, 23, 0));
        assert_eq!(moved.end_time, at(2024, 1, 10, 1, 0));
    }

    #[test]
    fn move_rejects_end_out_of_range() {
        let mut store = EventStore::new();
        let mut long = form("Forever", at(2024, 1, 1, 9, 0), 60);
        long.end_time = NaiveDateTime::MAX;
        let id = store.add_at(long, generated_at()).unwrap()[0].id.clone();

        let result = store.move_event(&id, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        assert!(matches!(result, Err(CalendarError::InvalidTimeRange { .. })));
        let event = store.get(&id).unwrap();
        assert_eq!(event.start_time, at(2024, 1, 1, 9, 0));
        assert_eq!(event.end_time, NaiveDateTime::MAX);
    }

    #[test]
    fn delete_series_base_removes_all_instances() {
        let mut store = EventStore::new();
        let keep = store
            .add_at(form("Keep", at(2024, 1, 1, 7, 0), 30), generated_at())
            .unwrap()[0]
            .id
            .clone();
        let series = store
            .add_at(
                recurring_form("Standup", at(2024, 1, 1, 9, 0), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()),
                generated_at(),
            )
            .unwrap();

        let removed = store.delete(&series[0].id).unwrap();

        assert_eq!(removed.len(), series.len());
        assert_eq!(store.len(), 1);
        assert!(store.get(&keep).is_some());
    }

    #[test]
    fn delete_instance_keeps_siblings() {
        let mut store = EventStore::new();
        let series = store
            .add_at(
                recurring_form("Standup", at(2024, 1, 1, 9, 0), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
                generated_at(),
            )
            .unwrap();

        let removed = store.delete(&series[2].id).unwrap();

        assert_eq!(removed, vec![series[2].clone()]);
        assert_eq!(store.len(), series.len() - 1);
        assert!(store.get(&series[0].id).is_some());
        assert!(store.get(&series[1].id).is_some());
        assert!(store.get(&series[3].id).is_some());
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let mut store = EventStore::new();
        assert!(matches!(store.delete("nope"), Err(CalendarError::NotFound(_))));
    }

    #[test]
    fn deletion_scope_follows_role() {
        let mut store = EventStore::new();
        let plain = store
            .add_at(form("Plain", at(2024, 1, 1, 7, 0), 30), generated_at())
            .unwrap();
        let series = store
            .add_at(
                recurring_form("Series", at(2024, 1, 1, 9, 0), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
                generated_at(),
            )
            .unwrap();

        assert_eq!(DeletionScope::of(&plain[0]), DeletionScope::Single);
        assert_eq!(DeletionScope::of(&series[0]), DeletionScope::Series);
        assert_eq!(DeletionScope::of(&series[1]), DeletionScope::Instance);
    }

    #[test]
    fn queries_by_day_and_month() {
        let mut store = EventStore::new();
        store
            .add_at(form("Late", at(2024, 2, 10, 18, 0), 30), generated_at())
            .unwrap();
        store
            .add_at(form("Early", at(2024, 2, 10, 8, 0), 30), generated_at())
            .unwrap();
        store
            .add_at(form("March", at(2024, 3, 1, 8, 0), 30), generated_at())
            .unwrap();

        let day = store.query_by_date(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(day.len(), 2);

        let month: Vec<_> = store.query_month(2024, 2).into_iter().map(|e| e.title.as_str()).collect();
        assert_eq!(month, vec!["Early", "Late"]);
    }

    #[test]
    fn conflicts_against_store() {
        let mut store = EventStore::new();
        store
            .add_at(form("Review", at(2024, 1, 8, 10, 30), 15), generated_at())
            .unwrap();
        store
            .add_at(form("Lunch", at(2024, 1, 8, 11, 0), 60), generated_at())
            .unwrap();

        let candidate = Event::from_form("candidate", form("Planning", at(2024, 1, 8, 10, 0), 60));
        let conflicts = store.query_conflicts(&candidate);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].title, "Review");
    }

    #[test]
    fn stored_event_does_not_conflict_with_itself() {
        let mut store = EventStore::new();
        let added = store
            .add_at(form("Review", at(2024, 1, 8, 10, 0), 60), generated_at())
            .unwrap();

        assert!(store.query_conflicts(&added[0]).is_empty());
    }

    #[test]
    fn search_matches_title_or_description() {
        let mut store = EventStore::new();
        store
            .add_at(form("Yoga", at(2024, 1, 8, 7, 0), 60), generated_at())
            .unwrap();
        let mut with_notes = form("Call", at(2024, 1, 8, 9, 0), 30);
        with_notes.description = "Discuss YOGA retreat".to_string();
        store.add_at(with_notes, generated_at()).unwrap();
        store
            .add_at(form("Dentist", at(2024, 1, 9, 9, 0), 30), generated_at())
            .unwrap();

        assert_eq!(store.search("yoga").len(), 2);
        assert_eq!(store.search("").len(), 3);
        assert!(store.search("piano").is_empty());
    }
}
