//! Double-booking detection.
//!
//! Events occupy the half-open interval `[start, end)`, so back-to-back events
//! do not conflict. A zero-duration event occupies the single instant `start`:
//! it conflicts with an interval that contains that instant and with another
//! zero-duration event at the same instant.

use crate::event::Event;

/// Whether two events occupy overlapping time.
pub fn overlaps(a: &Event, b: &Event) -> bool {
    match (a.is_zero_duration(), b.is_zero_duration()) {
        (false, false) => a.start_time < b.end_time && b.start_time < a.end_time,
        (true, false) => b.start_time <= a.start_time && a.start_time < b.end_time,
        (false, true) => a.start_time <= b.start_time && b.start_time < a.end_time,
        (true, true) => a.start_time == b.start_time,
    }
}

/// Every event in `existing` that overlaps `candidate`, in collection order.
///
/// Events sharing the candidate's id are skipped, so an event never conflicts
/// with its own stored copy.
pub fn find_conflicts<'a, I>(candidate: &Event, existing: I) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    existing
        .into_iter()
        .filter(|event| event.id != candidate.id)
        .filter(|event| overlaps(candidate, event))
        .collect()
}
