//! Utility functions for date input and display in commands
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parses "YYYY-MM-DD HH:MM", "YYYY-MM-DDTHH:MM[:SS]" or a bare "YYYY-MM-DD".
/// A bare date means the end of that day (23:59).
pub fn parse_deadline(input: &str) -> Result<NaiveDateTime, String> {
    let input = input.trim();

    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(dt);
        }
    }

    let date = parse_date(input)
        .map_err(|_| format!("Invalid deadline '{}'. Use YYYY-MM-DD or YYYY-MM-DD HH:MM", input))?;
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 0).ok_or("Invalid time")?;
    Ok(date.and_time(end_of_day))
}

pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD", input.trim()))
}

/// Parses "YYYY-MM" into (year, month)
pub fn parse_month(input: &str) -> Result<(i32, u32), String> {
    let input = input.trim();
    let invalid = || format!("Invalid month '{}'. Use YYYY-MM", input);

    let (year, month) = input.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

pub fn format_deadline(deadline: Option<NaiveDateTime>) -> String {
    deadline
        .map(|d| d.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}
