use chrono::NaiveDate;
use clap::Args;
use std::collections::BTreeSet;

use crate::application::commands::utils::date_format::parse_date;
use crate::application::commands::utils::weekly_parser::parse_weekdays;
use crate::domain::entities::recurrence::{RecurrenceKind, RecurrencePattern};

/// Recurrence flags shared by `add`, `edit` and `describe`
#[derive(Debug, Clone, Default, Args)]
pub struct RecurrenceArgs {
    /// none, daily, weekly, monthly or custom
    #[arg(long = "repeat", value_name = "KIND", value_parser = str::parse::<RecurrenceKind>)]
    pub kind: Option<RecurrenceKind>,

    /// Repeat every N days/weeks/months
    #[arg(long = "every", value_name = "N", default_value_t = 1,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub interval: u32,

    /// Weekdays for weekly repeats, e.g. "mon,wed,fri"
    #[arg(long = "on", value_name = "DAYS", value_parser = parse_weekdays)]
    pub weekdays: Option<BTreeSet<u8>>,

    /// Last date an occurrence may fall on (YYYY-MM-DD)
    #[arg(long = "until", value_name = "DATE", value_parser = parse_date,
          conflicts_with = "occurrences")]
    pub end_date: Option<NaiveDate>,

    /// Stop after N more occurrences
    #[arg(long = "times", value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub occurrences: Option<u32>,
}

impl RecurrenceArgs {
    /// `None` when no `--repeat` was given
    pub fn to_pattern(&self) -> Option<RecurrencePattern> {
        let kind = self.kind?;
        if kind == RecurrenceKind::None {
            return Some(RecurrencePattern::default());
        }

        let mut pattern = RecurrencePattern::new(kind, self.interval);
        if let Some(weekdays) = self.weekdays.as_ref().filter(|_| kind == RecurrenceKind::Weekly) {
            pattern = pattern.with_weekdays(weekdays.iter().copied());
        }
        if let Some(end_date) = self.end_date {
            pattern = pattern.with_end_date(end_date);
        }
        if let Some(occurrences) = self.occurrences {
            pattern = pattern.with_occurrences(occurrences);
        }
        Some(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_repeat_flag_means_no_pattern() {
        assert_eq!(RecurrenceArgs::default().to_pattern(), None);
    }

    #[test]
    fn weekdays_only_apply_to_weekly() {
        let args = RecurrenceArgs {
            kind: Some(RecurrenceKind::Daily),
            interval: 2,
            weekdays: Some(BTreeSet::from([1])),
            ..RecurrenceArgs::default()
        };
        let pattern = args.to_pattern().unwrap();
        assert_eq!(pattern.kind, RecurrenceKind::Daily);
        assert!(pattern.weekdays.is_empty());

        let weekly = RecurrenceArgs {
            kind: Some(RecurrenceKind::Weekly),
            ..args
        };
        assert_eq!(weekly.to_pattern().unwrap().weekdays, BTreeSet::from([1]));
    }
}
