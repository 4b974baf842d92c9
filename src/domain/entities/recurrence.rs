use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::domain::value_objects::weekday_format::WeekdayFormat;

/// Recurrence family of a task.
///
/// Persisted as its name ("Daily", "Weekly", ...). Names that are not
/// recognised load as `None`, so a task with a corrupted pattern simply stops
/// recurring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecurrenceKind {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    /// Interval in days, same as `Daily`
    Custom,
}

impl RecurrenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceKind::None => "None",
            RecurrenceKind::Daily => "Daily",
            RecurrenceKind::Weekly => "Weekly",
            RecurrenceKind::Monthly => "Monthly",
            RecurrenceKind::Custom => "Custom",
        }
    }
}

impl FromStr for RecurrenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(RecurrenceKind::None),
            "daily" => Ok(RecurrenceKind::Daily),
            "weekly" => Ok(RecurrenceKind::Weekly),
            "monthly" => Ok(RecurrenceKind::Monthly),
            "custom" => Ok(RecurrenceKind::Custom),
            _ => Err(format!(
                "Invalid recurrence '{}'. Use one of: none, daily, weekly, monthly, custom",
                s
            )),
        }
    }
}

impl From<String> for RecurrenceKind {
    fn from(name: String) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!("Unknown recurrence pattern '{}', treating as no recurrence", name);
            RecurrenceKind::None
        })
    }
}

impl From<RecurrenceKind> for String {
    fn from(kind: RecurrenceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

fn default_interval() -> u32 {
    1
}

/// Accepts `YYYY-MM-DD` as well as full ISO date-times and keeps the date part.
/// Unparseable values are dropped rather than failing the whole task file.
fn deserialize_end_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let value = value.trim();
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|dt| dt.date())
            })
    }))
}

/// Keeps the weekday indices that fit 0 (Monday) ..= 6 (Sunday) and drops the
/// rest, so one bad value does not make the whole task file unreadable.
fn deserialize_weekdays<'de, D>(deserializer: D) -> Result<BTreeSet<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<i64>> = Option::deserialize(deserializer)?;
    let mut weekdays = BTreeSet::new();
    for value in raw.unwrap_or_default() {
        match u8::try_from(value).ok().filter(|day| *day <= 6) {
            Some(day) => {
                weekdays.insert(day);
            }
            None => warn!("Ignoring invalid weekday {} in recurrence pattern", value),
        }
    }
    Ok(weekdays)
}

/// How a task repeats and when it stops repeating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrencePattern {
    #[serde(rename = "pattern_type", default)]
    pub kind: RecurrenceKind,
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// 0 = Monday ..= 6 = Sunday, only used by weekly patterns
    #[serde(default, deserialize_with = "deserialize_weekdays")]
    pub weekdays: BTreeSet<u8>,
    #[serde(default, deserialize_with = "deserialize_end_date")]
    pub end_date: Option<NaiveDate>,
    /// Remaining occurrences, decremented on every generated successor
    #[serde(default)]
    pub occurrences: Option<u32>,
}

impl Default for RecurrencePattern {
    fn default() -> Self {
        Self {
            kind: RecurrenceKind::None,
            interval: 1,
            weekdays: BTreeSet::new(),
            end_date: None,
            occurrences: None,
        }
    }
}

impl RecurrencePattern {
    pub fn new(kind: RecurrenceKind, interval: u32) -> Self {
        Self {
            kind,
            interval,
            ..Self::default()
        }
    }

    pub fn with_weekdays(mut self, weekdays: impl IntoIterator<Item = u8>) -> Self {
        self.weekdays = weekdays.into_iter().collect();
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_occurrences(mut self, occurrences: u32) -> Self {
        self.occurrences = Some(occurrences);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.kind != RecurrenceKind::None
    }

    /// Remaining occurrence count, ignoring an exhausted (zero) counter
    pub fn remaining_occurrences(&self) -> Option<u32> {
        self.occurrences.filter(|remaining| *remaining > 0)
    }

    /// Copy of this pattern with one occurrence consumed
    pub fn consume_occurrence(&self) -> Self {
        let mut next = self.clone();
        if let Some(remaining) = self.remaining_occurrences() {
            next.occurrences = Some(remaining - 1);
        }
        next
    }

    /// Weekday set restricted to valid indices
    fn valid_weekdays(&self) -> impl Iterator<Item = u32> + '_ {
        self.weekdays
            .iter()
            .filter(|day| Weekday::from_index(**day).is_some())
            .map(|day| *day as u32)
    }

    /// Next occurrence strictly after `from`, or `None` once the pattern is over
    pub fn next_occurrence(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        if let Some(end_date) = self.end_date {
            if from.date() >= end_date {
                return None;
            }
        }

        // a zero interval would never move forward
        let interval = self.interval.max(1);

        let candidate = match self.kind {
            RecurrenceKind::None => return None,
            RecurrenceKind::Daily | RecurrenceKind::Custom => {
                from.checked_add_signed(Duration::days(interval as i64))?
            }
            RecurrenceKind::Weekly => self.next_weekly(from, interval)?,
            RecurrenceKind::Monthly => from.checked_add_months(Months::new(interval))?,
        };

        match self.end_date {
            Some(end_date) if candidate.date() > end_date => None,
            _ => Some(candidate),
        }
    }

    fn next_weekly(&self, from: NaiveDateTime, interval: u32) -> Option<NaiveDateTime> {
        let current = from.weekday().num_days_from_monday();
        let weeks = interval as i64;

        let days_ahead = match self.valid_weekdays().min() {
            None => 7 * weeks,
            Some(first) => match self.valid_weekdays().find(|day| *day > current) {
                Some(later_this_week) => (later_this_week - current) as i64,
                // roll over to the first selected day of the next active week
                None => (7 - current as i64) + 7 * (weeks - 1) + first as i64,
            },
        };

        from.checked_add_signed(Duration::days(days_ahead))
    }

    /// Human-readable summary, e.g. "Every 2 weeks on Monday and Friday until 2024-01-01"
    pub fn describe(&self) -> String {
        let mut desc = match self.kind {
            RecurrenceKind::None => return "No recurrence".to_string(),
            RecurrenceKind::Daily => every(self.interval, "day", "days"),
            RecurrenceKind::Weekly => {
                let base = every(self.interval, "week", "weeks");
                let names: Vec<&str> = self
                    .valid_weekdays()
                    .filter_map(|day| Weekday::from_index(day as u8))
                    .map(|day| day.to_long_en())
                    .collect();

                match names.split_last() {
                    None => base,
                    Some((last, [])) => format!("{} on {}", base, last),
                    Some((last, rest)) => format!("{} on {} and {}", base, rest.join(", "), last),
                }
            }
            RecurrenceKind::Monthly => every(self.interval, "month", "months"),
            RecurrenceKind::Custom => format!("Every {} days", self.interval),
        };

        if let Some(end_date) = self.end_date {
            desc.push_str(&format!(" until {}", end_date.format("%Y-%m-%d")));
        } else if let Some(remaining) = self.remaining_occurrences() {
            desc.push_str(&format!(" for {} occurrences", remaining));
        }

        desc
    }
}

fn every(interval: u32, singular: &str, plural: &str) -> String {
    if interval == 1 {
        format!("Every {}", singular)
    } else {
        format!("Every {} {}", interval, plural)
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
