//! Parsing of user-typed dates, times, durations and weekday lists.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Hour given to events entered with a date but no time.
const DEFAULT_START_HOUR: u32 = 9;

const ISO_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Expand common abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    let abbrevs = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thur", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("jan", "january"),
        ("feb", "february"),
        ("mar", "march"),
        ("apr", "april"),
        ("jun", "june"),
        ("jul", "july"),
        ("aug", "august"),
        ("sep", "september"),
        ("sept", "september"),
        ("oct", "october"),
        ("nov", "november"),
        ("dec", "december"),
    ];

    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            abbrevs
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map(|(_, full)| full.to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check if the user's input string contains time-related tokens.
fn has_time_component(input: &str) -> bool {
    let lower = input.to_lowercase();

    if lower.contains("noon") || lower.contains("midnight") {
        return true;
    }

    // am/pm right after a digit, optionally separated by one space: "6pm", "6 pm"
    let bytes = lower.as_bytes();
    for i in 0..bytes.len().saturating_sub(1) {
        if (bytes[i] == b'a' || bytes[i] == b'p') && bytes[i + 1] == b'm' {
            let digit_before = i > 0 && bytes[i - 1].is_ascii_digit();
            let spaced_digit = i > 1 && bytes[i - 1] == b' ' && bytes[i - 2].is_ascii_digit();
            if digit_before || spaced_digit {
                return true;
            }
        }
    }

    // HH:MM
    bytes.windows(3).any(|w| w[0].is_ascii_digit() && w[1] == b':' && w[2].is_ascii_digit())
}

/// Parse a date/time the user typed.
///
/// Accepts ISO forms like "2024-03-20T15:00" first, then natural language
/// ("tomorrow 3pm", "fri 9:30"). Input without a time starts at 09:00.
pub fn parse_datetime(input: &str) -> Result<NaiveDateTime> {
    let trimmed = input.trim();

    for format in ISO_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(at_default_hour(date));
    }

    let expanded = expand_abbreviations(trimmed);
    let dt = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))?;

    if has_time_component(trimmed) {
        Ok(dt)
    } else {
        Ok(at_default_hour(dt.date()))
    }
}

/// Parse a calendar day ("2024-03-20", "next friday").
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    let expanded = expand_abbreviations(trimmed);
    fuzzydate::parse(&expanded)
        .map(|dt| dt.date())
        .map_err(|_| anyhow::anyhow!("Could not parse date: \"{}\"", input))
}

/// Parse "YYYY-MM" into (year, month).
pub fn parse_month(input: &str) -> Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}'. Expected YYYY-MM", input))?;
    Ok((first.year(), first.month()))
}

/// Parse a humantime duration ("30m", "1h 30m") into a chrono Duration.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let std_dur = humantime::parse_duration(input)
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    Duration::from_std(std_dur).context("Duration too large")
}

/// Parse a comma-separated weekday list ("mon,wed,fri" or "1,3,5") into
/// indices with Sunday = 0.
pub fn parse_weekdays(input: &str) -> Result<Vec<u8>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|token| -> Result<u8> {
            let lower = token.to_lowercase();
            let index = match lower.as_str() {
                "sun" | "sunday" => 0,
                "mon" | "monday" => 1,
                "tue" | "tues" | "tuesday" => 2,
                "wed" | "wednesday" => 3,
                "thu" | "thur" | "thurs" | "thursday" => 4,
                "fri" | "friday" => 5,
                "sat" | "saturday" => 6,
                _ => lower
                    .parse::<u8>()
                    .ok()
                    .filter(|n| *n <= 6)
                    .ok_or_else(|| anyhow::anyhow!("Unknown weekday: \"{}\"", token))?,
            };
            Ok(index)
        })
        .collect()
}

fn at_default_hour(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(DEFAULT_START_HOUR, 0, 0).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn time_component_am_pm() {
        assert!(has_time_component("tomorrow 6pm"));
        assert!(has_time_component("sat 3 pm"));
        assert!(has_time_component("9AM"));
    }

    #[test]
    fn time_component_colon_and_keywords() {
        assert!(has_time_component("march 20 9:30"));
        assert!(has_time_component("friday noon"));
    }

    #[test]
    fn no_time_component() {
        assert!(!has_time_component("tomorrow"));
        assert!(!has_time_component("next friday"));
        assert!(!has_time_component("december"));
        assert!(!has_time_component("camp"));
    }

    #[test]
    fn expand_abbreviations_words() {
        assert_eq!(expand_abbreviations("sat 3pm"), "saturday 3pm");
        assert_eq!(expand_abbreviations("sept 5"), "september 5");
        assert_eq!(expand_abbreviations("next friday"), "next friday");
    }

    #[test]
    fn parse_iso_datetime() {
        assert_eq!(parse_datetime("2024-03-20T15:00").unwrap(), at(2024, 3, 20, 15, 0));
        assert_eq!(parse_datetime("2024-03-20 08:45").unwrap(), at(2024, 3, 20, 8, 45));
    }

    #[test]
    fn date_only_starts_at_nine() {
        assert_eq!(parse_datetime("2024-03-20").unwrap(), at(2024, 3, 20, 9, 0));
        assert_eq!(parse_datetime("tomorrow").unwrap().format("%H:%M").to_string(), "09:00");
    }

    #[test]
    fn parse_natural_language_time() {
        let dt = parse_datetime("tomorrow 3pm").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "15:00");
    }

    #[test]
    fn parse_datetime_invalid_input() {
        assert!(parse_datetime("not a date at all xyz").is_err());
    }

    #[test]
    fn parse_month_values() {
        assert_eq!(parse_month("2024-02").unwrap(), (2024, 2));
        assert!(parse_month("2024-13").is_err());
    }

    #[test]
    fn parse_duration_values() {
        assert_eq!(parse_duration("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_duration("1h 30m").unwrap(), Duration::minutes(90));
        assert!(parse_duration("a while").is_err());
    }

    #[test]
    fn parse_weekday_names_and_numbers() {
        assert_eq!(parse_weekdays("mon,wed,fri").unwrap(), vec![1, 3, 5]);
        assert_eq!(parse_weekdays("Sunday, 6").unwrap(), vec![0, 6]);
        assert!(parse_weekdays("funday").is_err());
        assert!(parse_weekdays("7").is_err());
        assert_eq!(parse_weekdays("Tues, THURSDAY").unwrap(), vec![2, 4]);
    }

    #[test]
    fn weekday_lookalikes_are_rejected() {
        assert!(parse_weekdays("monkey").is_err());
        assert!(parse_weekdays("sunset").is_err());
        assert!(parse_weekdays("wednesdays").is_err());
    }
}
