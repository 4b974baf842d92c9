use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How long before the deadline a reminder should fire.
///
/// Stored in the task file by its display label ("1 hour before", ...). Labels
/// that are not recognised load as `NoReminder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReminderOffset {
    #[default]
    NoReminder,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    OneDay,
}

impl ReminderOffset {
    pub const ALL: [ReminderOffset; 6] = [
        ReminderOffset::NoReminder,
        ReminderOffset::FiveMinutes,
        ReminderOffset::FifteenMinutes,
        ReminderOffset::ThirtyMinutes,
        ReminderOffset::OneHour,
        ReminderOffset::OneDay,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReminderOffset::NoReminder => "No Reminder",
            ReminderOffset::FiveMinutes => "5 minutes before",
            ReminderOffset::FifteenMinutes => "15 minutes before",
            ReminderOffset::ThirtyMinutes => "30 minutes before",
            ReminderOffset::OneHour => "1 hour before",
            ReminderOffset::OneDay => "1 day before",
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            ReminderOffset::NoReminder => None,
            ReminderOffset::FiveMinutes => Some(Duration::minutes(5)),
            ReminderOffset::FifteenMinutes => Some(Duration::minutes(15)),
            ReminderOffset::ThirtyMinutes => Some(Duration::minutes(30)),
            ReminderOffset::OneHour => Some(Duration::hours(1)),
            ReminderOffset::OneDay => Some(Duration::days(1)),
        }
    }

    /// Reminder time for a given deadline, `None` when no reminder is configured
    pub fn reminder_time_for(&self, deadline: NaiveDateTime) -> Option<NaiveDateTime> {
        self.duration()
            .and_then(|offset| deadline.checked_sub_signed(offset))
    }
}

impl From<String> for ReminderOffset {
    fn from(label: String) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl From<ReminderOffset> for String {
    fn from(offset: ReminderOffset) -> Self {
        offset.label().to_string()
    }
}

impl FromStr for ReminderOffset {
    type Err = String;

    /// Accepts the stored label or a short form such as `15m`, `1h`, `1d`, `none`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if let Some(offset) = Self::ALL
            .iter()
            .find(|offset| offset.label().eq_ignore_ascii_case(input))
        {
            return Ok(*offset);
        }

        match input.to_lowercase().as_str() {
            "none" | "off" => Ok(ReminderOffset::NoReminder),
            "5m" => Ok(ReminderOffset::FiveMinutes),
            "15m" => Ok(ReminderOffset::FifteenMinutes),
            "30m" => Ok(ReminderOffset::ThirtyMinutes),
            "1h" => Ok(ReminderOffset::OneHour),
            "1d" => Ok(ReminderOffset::OneDay),
            _ => Err(format!(
                "Invalid reminder '{}'. Use one of: none, 5m, 15m, 30m, 1h, 1d",
                s
            )),
        }
    }
}

impl fmt::Display for ReminderOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn one_day_before_crosses_month_boundary() {
        let deadline = at(2024, 3, 1, 9, 0);
        assert_eq!(
            ReminderOffset::OneDay.reminder_time_for(deadline),
            Some(at(2024, 2, 29, 9, 0))
        );
    }

    #[test]
    fn no_reminder_has_no_time() {
        assert_eq!(
            ReminderOffset::NoReminder.reminder_time_for(at(2024, 1, 1, 0, 0)),
            None
        );
    }

    #[test]
    fn serializes_as_label_and_tolerates_unknown_labels() {
        let json = serde_json::to_string(&ReminderOffset::OneHour).unwrap();
        assert_eq!(json, "\"1 hour before\"");

        let unknown: ReminderOffset = serde_json::from_str("\"2 weeks before\"").unwrap();
        assert_eq!(unknown, ReminderOffset::NoReminder);
    }

    #[test]
    fn parses_short_forms() {
        assert_eq!("15m".parse(), Ok(ReminderOffset::FifteenMinutes));
        assert_eq!("1 Day Before".parse(), Ok(ReminderOffset::OneDay));
        assert!("soon".parse::<ReminderOffset>().is_err());
    }
}
