//! Recurrence expansion for recurring events.
//!
//! Turns a base event plus its rule into the bounded, ordered list of concrete
//! instances that get stored alongside it. Expansion stops at the rule's end
//! date (or a year after generation) and never emits more than
//! [`MAX_GENERATED_INSTANCES`] instances.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HORIZON_DAYS, MAX_GENERATED_INSTANCES};
use crate::error::{CalendarError, CalendarResult};
use crate::event::Event;

/// Rule type as authored in the event form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
    /// Free-text rule in `custom_pattern`, e.g. "every 2 weeks".
    Custom,
}

/// How a base event repeats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePattern {
    #[serde(rename = "type")]
    pub kind: RecurrenceKind,
    pub interval: u32,
    /// Weekday indices, 0 = Sunday through 6 = Saturday. Only used by weekly rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,
    /// Last day (inclusive) on which an instance may start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_pattern: Option<String>,
}

/// Concrete stepping unit once custom patterns are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub frequency: Frequency,
    pub interval: u32,
}

impl Cadence {
    const FALLBACK: Cadence = Cadence {
        frequency: Frequency::Daily,
        interval: 1,
    };
}

impl RecurrencePattern {
    pub fn new(kind: RecurrenceKind, interval: u32) -> Self {
        RecurrencePattern {
            kind,
            interval,
            days_of_week: None,
            end_date: None,
            custom_pattern: None,
        }
    }

    /// Reject rules that could not advance or that name impossible weekdays.
    ///
    /// A custom rule's `interval` is ignored during expansion, so it is not checked.
    pub fn validate(&self) -> CalendarResult<()> {
        if self.kind != RecurrenceKind::Custom && self.interval == 0 {
            return Err(CalendarError::InvalidRecurrenceRule(
                "interval must be at least 1".into(),
            ));
        }
        if let Some(day) = self
            .days_of_week
            .iter()
            .flatten()
            .find(|day| **day > 6)
        {
            return Err(CalendarError::InvalidRecurrenceRule(format!(
                "weekday index {} is outside 0 (Sunday) to 6 (Saturday)",
                day
            )));
        }
        Ok(())
    }

    /// The frequency and interval expansion actually steps by.
    pub fn cadence(&self) -> Cadence {
        match self.kind {
            RecurrenceKind::Daily => Cadence {
                frequency: Frequency::Daily,
                interval: self.interval,
            },
            RecurrenceKind::Weekly => Cadence {
                frequency: Frequency::Weekly,
                interval: self.interval,
            },
            RecurrenceKind::Monthly => Cadence {
                frequency: Frequency::Monthly,
                interval: self.interval,
            },
            RecurrenceKind::Custom => self
                .custom_pattern
                .as_deref()
                .and_then(parse_custom_pattern)
                .unwrap_or(Cadence::FALLBACK),
        }
    }

    /// Weekday set sorted ascending with duplicates removed.
    pub fn sorted_days(&self) -> Vec<u8> {
        let mut days = self.days_of_week.clone().unwrap_or_default();
        days.sort_unstable();
        days.dedup();
        days
    }

    /// Latest instant an instance may start at.
    pub fn horizon(&self, generated_at: NaiveDateTime) -> NaiveDateTime {
        match self.end_date {
            Some(end) => end
                .and_hms_nano_opt(23, 59, 59, 999_999_999)
                .unwrap_or(NaiveDateTime::MAX),
            None => generated_at
                .checked_add_signed(Duration::days(DEFAULT_HORIZON_DAYS))
                .unwrap_or(NaiveDateTime::MAX),
        }
    }
}

/// Rule texts checked in order; the first one found anywhere in the text wins.
static CUSTOM_RULES: LazyLock<Vec<(Frequency, Regex)>> = LazyLock::new(|| {
    [
        (Frequency::Weekly, r"every\s+(\d+)\s+weeks?"),
        (Frequency::Daily, r"every\s+(\d+)\s+days?"),
        (Frequency::Monthly, r"every\s+(\d+)\s+months?"),
    ]
    .into_iter()
    .filter_map(|(frequency, rule)| Regex::new(rule).ok().map(|re| (frequency, re)))
    .collect()
});

/// Find "every <N> day(s)|week(s)|month(s)" in a free-text rule, case-insensitive.
///
/// Surrounding words are ignored, so "meet every 2 weeks on monday" is
/// weekly/2. Returns `None` when no form is found or `N == 0`.
pub fn parse_custom_pattern(text: &str) -> Option<Cadence> {
    let normalized = text.trim().to_lowercase();

    let (frequency, count) = CUSTOM_RULES.iter().find_map(|(frequency, re)| {
        let captures = re.captures(&normalized)?;
        Some((*frequency, captures.get(1)?.as_str().to_string()))
    })?;

    let interval: u32 = count.parse().ok().filter(|n| *n > 0)?;

    Some(Cadence {
        frequency,
        interval,
    })
}

/// Next occurrence of a weekly rule restricted to `sorted_days`.
///
/// Picks the next listed weekday later in the current week; past the last one
/// it lands on the first listed weekday `interval` weeks ahead. An empty set
/// degrades to a plain `7 * interval` day step.
pub fn next_weekly_occurrence(
    current: NaiveDateTime,
    sorted_days: &[u8],
    interval: u32,
) -> Option<NaiveDateTime> {
    let Some(&first) = sorted_days.first() else {
        return add_days(current, 7 * i64::from(interval));
    };

    let today = current.weekday().num_days_from_sunday() as i64;

    let offset = match sorted_days.iter().find(|day| i64::from(**day) > today) {
        Some(&day) => i64::from(day) - today,
        None => 7 - today + i64::from(first) + 7 * (i64::from(interval) - 1),
    };

    add_days(current, offset)
}

/// Add calendar months, rolling a missing day-of-month into the next month.
///
/// January 31st plus one month is March 2nd in a leap year (March 3rd otherwise).
pub fn add_months_rolling(current: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    let month_index = i64::from(current.year()) * 12 + i64::from(current.month0()) + i64::from(months);
    let year = i32::try_from(month_index.div_euclid(12)).ok()?;
    let month0 = month_index.rem_euclid(12) as u32;

    let first_of_month = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    let date = first_of_month.checked_add_signed(Duration::days(i64::from(current.day0())))?;

    Some(date.and_time(current.time()))
}

fn add_days(current: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    current.checked_add_signed(Duration::days(days))
}

/// Compute the occurrence after `current`. `None` means the calendar ran out.
fn step(current: NaiveDateTime, cadence: Cadence, sorted_days: &[u8]) -> Option<NaiveDateTime> {
    let interval = cadence.interval;
    match cadence.frequency {
        Frequency::Daily => add_days(current, i64::from(interval)),
        Frequency::Weekly => next_weekly_occurrence(current, sorted_days, interval),
        Frequency::Monthly => add_months_rolling(current, interval),
    }
}

/// Id of the instance of `base_id` starting at `start`.
pub fn instance_id(base_id: &str, start: NaiveDateTime) -> String {
    format!("{}-{}", base_id, start.and_utc().timestamp_millis())
}

/// `None` when the instance would end past the last representable instant.
fn make_instance(base: &Event, start: NaiveDateTime, duration: Duration) -> Option<Event> {
    Some(Event {
        id: instance_id(&base.id, start),
        start_time: start,
        end_time: start.checked_add_signed(duration)?,
        parent_event_id: Some(base.id.clone()),
        ..base.clone()
    })
}

/// Expand a recurring base event into the base followed by its instances.
///
/// Non-recurring events (or recurring ones without a rule) come back alone.
/// `generated_at` anchors the default one-year horizon used when the rule has
/// no end date.
pub fn expand(base: &Event, generated_at: NaiveDateTime) -> CalendarResult<Vec<Event>> {
    let Some(pattern) = base.active_recurrence() else {
        return Ok(vec![base.clone()]);
    };
    pattern.validate()?;

    let cadence = pattern.cadence();
    let sorted_days = pattern.sorted_days();
    let horizon = pattern.horizon(generated_at);
    let duration = base.duration();

    let mut events = vec![base.clone()];
    let mut current = base.start_time;

    while current <= horizon && events.len() <= MAX_GENERATED_INSTANCES {
        let Some(next) = step(current, cadence, &sorted_days) else {
            break;
        };
        if next > horizon {
            break;
        }
        let Some(instance) = make_instance(base, next, duration) else {
            tracing::warn!(event_id = %base.id, %next, "Instance end out of range, stopping expansion");
            break;
        };
        events.push(instance);
        current = next;
    }

    let generated = events.len() - 1;
    if generated == MAX_GENERATED_INSTANCES
        && step(current, cadence, &sorted_days).is_some_and(|next| next <= horizon)
    {
        tracing::warn!(
            event_id = %base.id,
            "Recurrence truncated at {} instances",
            MAX_GENERATED_INSTANCES
        );
    }
    tracing::debug!(
        event_id = %base.id,
        ?cadence,
        generated,
        "Expanded recurring event"
    );

    Ok(events)
}

/// [`expand`] anchored at the current local time.
pub fn expand_now(base: &Event) -> CalendarResult<Vec<Event>> {
    expand(base, Local::now().naive_local())
}
