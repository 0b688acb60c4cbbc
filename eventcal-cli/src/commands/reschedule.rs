use anyhow::Result;
use eventcal_core::EventStore;
use owo_colors::OwoColorize;

use crate::render::{Render, render_conflicts};
use crate::utils::time::parse_date;

/// Move an event to another day, keeping its time of day.
pub fn run(store: &mut EventStore, id: &str, date: &str) -> Result<()> {
    let date = parse_date(date)?;
    let moved = store.move_event(id, date)?.clone();

    println!("{}", format!("  Moved: {}", moved.title).green());
    println!("   {}", moved.render());

    let conflicts = store.query_conflicts(&moved);
    if !conflicts.is_empty() {
        println!();
        println!("{}", render_conflicts(&moved, &conflicts));
    }

    Ok(())
}
