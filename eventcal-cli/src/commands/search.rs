use anyhow::Result;
use eventcal_core::EventStore;
use owo_colors::OwoColorize;

use crate::render::{pluralize, render_event_list};

pub fn run(store: &EventStore, query: &str) -> Result<()> {
    let mut matches = store.search(query);
    matches.sort_by_key(|e| e.start_time);

    println!(
        "{}",
        format!("  {} {} matching \"{}\"", matches.len(), pluralize("event", matches.len()), query)
            .bold()
    );
    println!("{}", render_event_list(&matches, "No matches"));

    Ok(())
}
