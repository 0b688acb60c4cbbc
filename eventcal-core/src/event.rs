//! Event records.
//!
//! Times are local wall-clock values (`NaiveDateTime`). They serialize as
//! ISO-8601 without an offset, so "9am every day" stays 9am after a
//! round-trip no matter which timezone reads the file.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CATEGORY;
use crate::error::{CalendarError, CalendarResult};
use crate::recurrence::RecurrencePattern;

/// A scheduled item, either user-authored or generated from a recurring base event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrencePattern>,
    /// Id of the base event this instance was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_event_id: Option<String>,
}

/// User-authored fields of a new event, before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFormData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrencePattern>,
}

/// Partial form data. Present fields replace the stored ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurrence: Option<RecurrencePattern>,
}

impl Event {
    pub fn from_form(id: impl Into<String>, form: EventFormData) -> Self {
        Event {
            id: id.into(),
            title: form.title,
            description: form.description,
            start_time: form.start_time,
            end_time: form.end_time,
            color: form.color,
            category: form.category,
            is_recurring: form.is_recurring,
            recurrence: form.recurrence,
            parent_event_id: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn is_zero_duration(&self) -> bool {
        self.start_time == self.end_time
    }

    /// Category label, falling back to the "General" sentinel.
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    /// True for an instance generated from another event.
    pub fn is_instance(&self) -> bool {
        self.parent_event_id.is_some()
    }

    /// True for the user-authored head of a recurring series.
    pub fn is_series_base(&self) -> bool {
        self.is_recurring && self.parent_event_id.is_none()
    }

    /// The pattern to expand, if this event should be expanded at all.
    pub fn active_recurrence(&self) -> Option<&RecurrencePattern> {
        if self.is_recurring {
            self.recurrence.as_ref()
        } else {
            None
        }
    }

    /// Check the time range and, for recurring events, the rule.
    pub fn validate(&self) -> CalendarResult<()> {
        if self.end_time < self.start_time {
            return Err(CalendarError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        if let Some(pattern) = self.active_recurrence() {
            pattern.validate()?;
        }
        Ok(())
    }

    /// Merge the present fields of `update` into this event.
    pub fn apply(&mut self, update: EventUpdate) {
        let EventUpdate {
            title,
            description,
            start_time,
            end_time,
            color,
            category,
            is_recurring,
            recurrence,
        } = update;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(start) = start_time {
            self.start_time = start;
        }
        if let Some(end) = end_time {
            self.end_time = end;
        }
        if let Some(color) = color {
            self.color = color;
        }
        if category.is_some() {
            self.category = category;
        }
        if let Some(is_recurring) = is_recurring {
            self.is_recurring = is_recurring;
        }
        if recurrence.is_some() {
            self.recurrence = recurrence;
        }
    }

    /// Format the time span for display, e.g. "2024-01-01 09:00 - 10:00".
    pub fn render_event_time(&self) -> String {
        let start = self.start_time.format("%Y-%m-%d %H:%M");
        if self.start_time.date() == self.end_time.date() {
            format!("{} - {}", start, self.end_time.format("%H:%M"))
        } else {
            format!("{} - {}", start, self.end_time.format("%Y-%m-%d %H:%M"))
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
