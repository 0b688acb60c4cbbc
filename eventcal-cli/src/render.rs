//! TUI rendering traits for eventcal types.
//!
//! Extension traits that add colored terminal rendering to eventcal-core
//! types using owo_colors.

use eventcal_core::recurrence::{Cadence, Frequency};
use eventcal_core::{Event, RecurrenceKind, RecurrencePattern};
use owo_colors::OwoColorize;

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Parse "#RRGGBB" into its components.
fn hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// The event's own color as a bullet, or a plain bullet if it isn't hex.
fn bullet(color: &str) -> String {
    match hex_rgb(color) {
        Some((r, g, b)) => "●".truecolor(r, g, b).to_string(),
        None => "●".to_string(),
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {} {} {}",
            bullet(&self.color),
            self.title.bold(),
            self.render_event_time().dimmed(),
            format!("[{}]", self.category()).cyan()
        );
        if self.is_instance() {
            line.push_str(&format!(" {}", "↻".dimmed()));
        } else if let Some(pattern) = self.active_recurrence() {
            line.push_str(&format!(" {}", pattern.render().dimmed()));
        }
        line.push_str(&format!("  {}", self.id.dimmed()));
        line
    }
}

impl Render for RecurrencePattern {
    fn render(&self) -> String {
        let Cadence {
            frequency,
            interval,
        } = self.cadence();
        let unit = match frequency {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
        };

        let mut text = if interval == 1 {
            format!("every {}", unit)
        } else {
            format!("every {} {}s", interval, unit)
        };

        let days = self.sorted_days();
        if frequency == Frequency::Weekly && !days.is_empty() {
            let names: Vec<_> = days
                .iter()
                .filter_map(|d| WEEKDAY_NAMES.get(usize::from(*d)))
                .copied()
                .collect();
            text.push_str(&format!(" on {}", names.join(", ")));
        }
        if let Some(end) = self.end_date {
            text.push_str(&format!(" until {}", end));
        }
        if self.kind == RecurrenceKind::Custom {
            if let Some(raw) = &self.custom_pattern {
                text.push_str(&format!(" (\"{}\")", raw));
            }
        }
        text
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

/// Render a list of events, or a dimmed placeholder when there are none.
pub fn render_event_list(events: &[&Event], empty: &str) -> String {
    if events.is_empty() {
        return format!("   {}", empty.dimmed());
    }
    events
        .iter()
        .map(|event| format!("   {}", event.render()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render conflict warnings for an event.
pub fn render_conflicts(event: &Event, conflicts: &[&Event]) -> String {
    let mut lines = vec![format!(
        "  {} {} overlaps {} {}:",
        "⚠".yellow(),
        event.title.yellow(),
        conflicts.len(),
        pluralize("event", conflicts.len())
    )];
    lines.extend(conflicts.iter().map(|c| format!("     {}", c.render())));
    lines.join("\n")
}

/// Field-by-field changes between two versions of an event.
pub fn render_field_changes(old: &Event, new: &Event) -> Vec<String> {
    let mut lines = Vec::new();

    let mut change = |field: &str, before: String, after: String| {
        if before != after {
            lines.push(format!("{}: {} → {}", field.dimmed(), before.red(), after.green()));
        }
    };

    change("title", old.title.clone(), new.title.clone());
    change("description", old.description.clone(), new.description.clone());
    change("time", old.render_event_time(), new.render_event_time());
    change("color", old.color.clone(), new.color.clone());
    change("category", old.category().to_string(), new.category().to_string());

    lines
}
