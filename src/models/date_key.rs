use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Identity of a calendar day.
///
/// Cache entries and completion records are keyed by `DateKey`. The canonical
/// text form is `YYYY-MM-DD`; the browser-style day string (`Wed Jan 01 2026`)
/// is also accepted when parsing. Ordering follows the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Key for the current local calendar day.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Key for the local calendar day containing the given instant.
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self(instant.with_timezone(&Local).date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Human-readable descriptor, e.g. `Thursday, January 1, 2026`.
    pub fn descriptor(&self) -> String {
        self.0.format("%A, %B %-d, %Y").to_string()
    }

    fn parse_day_string(s: &str) -> Option<NaiveDate> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        // The weekday token is not trusted; month/day/year decide the day.
        let [_, month, day, year] = parts.as_slice() else {
            return None;
        };
        NaiveDate::parse_from_str(&format!("{} {} {}", month, day, year), "%b %d %Y").ok()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, CANONICAL_FORMAT) {
            return Ok(Self(date));
        }
        Self::parse_day_string(trimmed)
            .map(Self)
            .ok_or_else(|| DateKeyError::Invalid(s.to_string()))
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DateKeyError {
    Invalid(String),
}

impl fmt::Display for DateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateKeyError::Invalid(s) => write!(
                f,
                "Invalid date '{}'. Use YYYY-MM-DD or 'Wed Jan 01 2026'.",
                s
            ),
        }
    }
}

impl std::error::Error for DateKeyError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveTime};

    #[test]
    fn test_canonical_display() {
        let key = DateKey::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(key.to_string(), "2026-01-01");
    }

    #[test]
    fn test_day_string_and_iso_are_same_key() {
        let iso: DateKey = "2026-01-01".parse().unwrap();
        let day_string: DateKey = "Wed Jan 01 2026".parse().unwrap();
        assert_eq!(iso, day_string);
    }

    #[test]
    fn test_day_string_ignores_weekday() {
        let a: DateKey = "Thu Jan 01 2026".parse().unwrap();
        let b: DateKey = "Mon Jan 01 2026".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_date() {
        assert!("2026-13-01".parse::<DateKey>().is_err());
        assert!("tomorrow".parse::<DateKey>().is_err());
        assert!("".parse::<DateKey>().is_err());
        let err = "nope".parse::<DateKey>().unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_same_local_day_same_key() {
        let morning = Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2026, 3, 14)
                    .unwrap()
                    .and_time(NaiveTime::from_hms_opt(0, 5, 0).unwrap()),
            )
            .earliest()
            .unwrap();
        let night = Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2026, 3, 14)
                    .unwrap()
                    .and_time(NaiveTime::from_hms_opt(23, 55, 0).unwrap()),
            )
            .earliest()
            .unwrap();

        assert_eq!(DateKey::from_datetime(&morning), DateKey::from_datetime(&night));

        // Same instant expressed in another zone still lands on the local day.
        let shifted = night.with_timezone(&FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(DateKey::from_datetime(&shifted), DateKey::from_datetime(&night));
    }

    #[test]
    fn test_ordering_follows_calendar() {
        let a: DateKey = "2025-12-31".parse().unwrap();
        let b: DateKey = "2026-01-01".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_descriptor() {
        let key: DateKey = "2026-01-01".parse().unwrap();
        assert_eq!(key.descriptor(), "Thursday, January 1, 2026");
    }

    #[test]
    fn test_json_is_canonical_string() {
        let key: DateKey = "Wed Jan 01 2026".parse().unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2026-01-01\"");

        let parsed: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }
}
