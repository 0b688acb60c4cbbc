//! JSON file storage for events.

use std::path::Path;

use crate::error::CalendarResult;
use crate::event::Event;

/// Read events from a JSON file. A missing file yields no events.
pub fn load_events(path: &Path) -> CalendarResult<Vec<Event>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let events: Vec<Event> = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), count = events.len(), "Loaded events");
    Ok(events)
}

/// Write events to a JSON file, creating its directory if needed.
pub fn save_events(path: &Path, events: &[Event]) -> CalendarResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(events)?;
    std::fs::write(path, content)?;

    tracing::debug!(path = %path.display(), count = events.len(), "Saved events");
    Ok(())
}
