use anyhow::{Result, anyhow};
use clap::Args;
use eventcal_core::{CalendarError, Event, EventStore, EventUpdate};
use owo_colors::OwoColorize;

use crate::render::render_field_changes;
use crate::utils::time::parse_datetime;

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// New start; the end moves along unless --end is given
    #[arg(short, long)]
    pub start: Option<String>,

    #[arg(short, long)]
    pub end: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub category: Option<String>,
}

impl EditArgs {
    /// The update these flags describe for `old`.
    ///
    /// A new start without a new end keeps the event's length.
    pub fn to_update(&self, old: &Event) -> Result<EventUpdate> {
        let start_time = self.start.as_deref().map(parse_datetime).transpose()?;
        let mut end_time = self.end.as_deref().map(parse_datetime).transpose()?;

        if let (Some(start), None) = (start_time, end_time) {
            let end = start
                .checked_add_signed(old.duration())
                .ok_or_else(|| anyhow!("Event would end out of range when starting at {}", start))?;
            end_time = Some(end);
        }

        Ok(EventUpdate {
            title: self.title.clone(),
            description: self.description.clone(),
            start_time,
            end_time,
            color: self.color.clone(),
            category: self.category.clone(),
            ..Default::default()
        })
    }
}

pub fn run(store: &mut EventStore, id: &str, args: EditArgs) -> Result<()> {
    let old = store
        .get(id)
        .cloned()
        .ok_or_else(|| CalendarError::NotFound(id.to_string()))?;

    let update = args.to_update(&old)?;
    let new = store.update(id, update)?;
    let changes = render_field_changes(&old, new);

    if changes.is_empty() {
        println!("{}", "  Nothing changed".dimmed());
        return Ok(());
    }

    println!("{}", format!("  Updated: {}", new.title).green());
    for line in changes {
        println!("   {}", line);
    }

    Ok(())
}
