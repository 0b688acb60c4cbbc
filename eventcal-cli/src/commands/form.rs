//! Event form arguments shared by `add` and `expand`.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use eventcal_core::config::EventcalConfig;
use eventcal_core::constants::DEFAULT_CATEGORY;
use eventcal_core::{EventFormData, RecurrenceKind, RecurrencePattern};

use crate::utils::time::{parse_date, parse_datetime, parse_duration, parse_weekdays};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RepeatKind {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl From<RepeatKind> for RecurrenceKind {
    fn from(kind: RepeatKind) -> Self {
        match kind {
            RepeatKind::Daily => RecurrenceKind::Daily,
            RepeatKind::Weekly => RecurrenceKind::Weekly,
            RepeatKind::Monthly => RecurrenceKind::Monthly,
            RepeatKind::Custom => RecurrenceKind::Custom,
        }
    }
}

#[derive(Args, Debug)]
pub struct EventArgs {
    pub title: String,

    /// Start date/time (e.g. "2025-03-20T15:00", "tomorrow 3pm")
    #[arg(short, long)]
    pub start: String,

    /// End date/time
    #[arg(short, long, conflicts_with = "duration")]
    pub end: Option<String>,

    /// Duration (e.g. "30m", "1h 30m"); defaults to default_duration from config
    #[arg(short, long)]
    pub duration: Option<String>,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Display color, e.g. "#EF4444"
    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[command(flatten)]
    pub repeat: RepeatArgs,
}

#[derive(Args, Debug)]
pub struct RepeatArgs {
    /// Repeat the event
    #[arg(long, value_enum)]
    pub repeat: Option<RepeatKind>,

    /// Repeat every N days/weeks/months
    #[arg(long, default_value_t = 1)]
    pub every: u32,

    /// Weekdays for weekly repeats, e.g. "mon,wed,fri"
    #[arg(long)]
    pub on: Option<String>,

    /// Last day on which the event repeats (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    /// Free-text rule, e.g. "every 2 weeks"
    #[arg(long)]
    pub pattern: Option<String>,
}

impl RepeatArgs {
    /// The rule these flags describe, or `None` for a one-off event.
    ///
    /// `--pattern` alone implies a custom rule and `--on` alone a weekly one.
    pub fn to_pattern(&self) -> Result<Option<RecurrencePattern>> {
        let kind = match (self.repeat, &self.pattern, &self.on) {
            (Some(kind), _, _) => RecurrenceKind::from(kind),
            (None, Some(_), _) => RecurrenceKind::Custom,
            (None, None, Some(_)) => RecurrenceKind::Weekly,
            (None, None, None) => return Ok(None),
        };

        let mut pattern = RecurrencePattern::new(kind, self.every);
        pattern.days_of_week = self.on.as_deref().map(parse_weekdays).transpose()?;
        pattern.end_date = self.until.as_deref().map(parse_date).transpose()?;
        pattern.custom_pattern = self.pattern.clone();

        Ok(Some(pattern))
    }
}

impl EventArgs {
    pub fn to_form(&self, config: &EventcalConfig) -> Result<EventFormData> {
        let start_time = parse_datetime(&self.start)?;

        let end_time = match (&self.end, &self.duration) {
            (Some(end), _) => parse_datetime(end)?,
            (None, duration) => {
                let duration = match duration {
                    Some(duration) => parse_duration(duration)?,
                    None => config.event_duration()?,
                };
                start_time
                    .checked_add_signed(duration)
                    .context("Event would end out of range")?
            }
        };

        let recurrence = self
            .repeat
            .to_pattern()
            .context("Invalid repeat options")?;

        Ok(EventFormData {
            title: self.title.clone(),
            description: self.description.clone(),
            start_time,
            end_time,
            color: self
                .color
                .clone()
                .unwrap_or_else(|| config.default_color.clone()),
            category: self.category.clone().or_else(|| {
                (config.default_category != DEFAULT_CATEGORY)
                    .then(|| config.default_category.clone())
            }),
            is_recurring: recurrence.is_some(),
            recurrence,
        })
    }
}
