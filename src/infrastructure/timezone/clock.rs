use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Wall clock for the zone deadlines are written in.
///
/// Deadlines are stored as naive local date-times, so "now" has to be taken in
/// the same zone before comparing against them.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    timezone: Tz,
}

impl Clock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

/// Parses an IANA timezone name such as "Europe/Madrid"
pub fn parse_timezone(name: &str) -> Result<Tz, String> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| format!("Unknown timezone '{}'", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn parses_known_zones() {
        assert_eq!(
            parse_timezone("America/New_York").unwrap(),
            Tz::America__New_York
        );
        assert!(parse_timezone("Mars/Olympus_Mons").is_err());
    }

    #[test]
    fn utc_clock_tracks_utc_now() {
        let clock = Clock::default();
        let drift = clock.now() - Utc::now().naive_utc();
        assert!(drift.abs() < Duration::seconds(5));
    }
}
