use chrono::Weekday;
use std::collections::BTreeSet;

use crate::domain::value_objects::weekday_format::WeekdayFormat;

/// Parse a comma separated weekday list ("mon,fri" or "Monday, Friday") into
/// weekday indices, 0 = Monday ..= 6 = Sunday
pub fn parse_weekdays(input: &str) -> Result<BTreeSet<u8>, String> {
    let mut weekdays = BTreeSet::new();

    for day in input.split(',').filter(|d| !d.trim().is_empty()) {
        let weekday =
            Weekday::parse_weekday(day).ok_or_else(|| format!("Invalid weekday: {}", day.trim()))?;
        weekdays.insert(weekday.num_days_from_monday() as u8);
    }

    if weekdays.is_empty() {
        return Err("At least one weekday must be specified".to_string());
    }

    Ok(weekdays)
}
