use anyhow::Result;
use eventcal_core::{CalendarError, EventStore};
use owo_colors::OwoColorize;

use crate::render::{Render, render_conflicts};

/// Show stored events that overlap the event with this id.
pub fn run(store: &EventStore, id: &str) -> Result<()> {
    let event = store
        .get(id)
        .ok_or_else(|| CalendarError::NotFound(id.to_string()))?;

    let conflicts = store.query_conflicts(event);
    if conflicts.is_empty() {
        println!("   {}", event.render());
        println!("{}", "  No conflicts".green());
    } else {
        println!("{}", render_conflicts(event, &conflicts));
    }

    Ok(())
}
