use anyhow::Result;
use chrono::{Local, NaiveDate};
use eventcal_core::{Event, EventStore};
use owo_colors::OwoColorize;

use crate::render::{Render, render_event_list};
use crate::utils::time::{parse_date, parse_month};

pub fn run(store: &EventStore, date: Option<&str>, month: Option<&str>) -> Result<()> {
    if let Some(month) = month {
        let (year, month) = parse_month(month)?;
        return print_month(store, year, month);
    }

    let date = match date {
        Some(input) => parse_date(input)?,
        None => Local::now().date_naive(),
    };

    let mut events = store.query_by_date(date);
    events.sort_by_key(|e| e.start_time);

    println!("{}", format_date_label(date).bold());
    println!("{}", render_event_list(&events, "No events"));

    Ok(())
}

/// Month view: events grouped under a heading per day.
fn print_month(store: &EventStore, year: i32, month: u32) -> Result<()> {
    let events = store.query_month(year, month);

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    let mut current_date: Option<NaiveDate> = None;

    for event in &events {
        let date = event.start_time.date();

        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", format_date_label(date).bold());
            current_date = Some(date);
        }

        println!("   {}", event.render());
    }

    print_summary(&events);
    Ok(())
}

fn print_summary(events: &[&Event]) {
    let recurring = events.iter().filter(|e| e.is_recurring).count();
    println!();
    println!(
        "{}",
        format!("{} events, {} recurring", events.len(), recurring).dimmed()
    );
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
fn format_date_label(date: NaiveDate) -> String {
    let today = Local::now().date_naive();

    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d %Y").to_string(),
    }
}
