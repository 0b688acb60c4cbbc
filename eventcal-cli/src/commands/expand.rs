use anyhow::Result;
use eventcal_core::recurrence::expand_now;
use eventcal_core::{Event, EventFormData};
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize};

/// Print the events `add` would create, without saving anything.
pub fn run(form: EventFormData) -> Result<()> {
    let event = Event::from_form("preview", form);
    event.validate()?;

    let events = expand_now(&event)?;

    println!(
        "{}",
        format!("  {} {}", events.len(), pluralize("occurrence", events.len())).bold()
    );
    for event in &events {
        println!("   {}", event.render());
    }

    Ok(())
}
