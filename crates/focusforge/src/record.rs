//! Session log records
//!
//! One CSV line per completed focus session:
//! `YYYY-MM-DD,HH:MM,<duration_seconds>,"<label>"`
//!
//! The label is quoted with no escaping, so a label containing `"` is cut at
//! the first quote when read back.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Timelike};
use std::fmt;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";
const SECS_PER_DAY: i64 = 86_400;

/// Why a session log line was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid start time: {0}")]
    InvalidTime(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("label is not quoted")]
    UnquotedLabel,
}

/// A completed focus session as stored in sessions.csv
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLogEntry {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_secs: i64,
    pub label: String,
}

impl SessionLogEntry {
    pub fn new(start: DateTime<Local>, duration_secs: i64, label: &str) -> Self {
        let naive = start.naive_local();
        Self {
            date: naive.date(),
            // Minute precision, matching what the file can hold
            start_time: naive
                .time()
                .with_second(0)
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(naive.time()),
            duration_secs: duration_secs.max(0),
            label: label.to_string(),
        }
    }

    /// Parse one log line. Trailing newline / carriage return are ignored.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim_end_matches(['\n', '\r']);
        let mut fields = line.splitn(4, ',');

        let date = fields.next().filter(|f| !f.is_empty()).ok_or(ParseError::MissingField("date"))?;
        let time = fields.next().ok_or(ParseError::MissingField("start time"))?;
        let duration = fields.next().ok_or(ParseError::MissingField("duration"))?;
        let label = fields.next().ok_or(ParseError::MissingField("label"))?;

        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| ParseError::InvalidDate(date.to_string()))?;
        let start_time = NaiveTime::parse_from_str(time, TIME_FORMAT)
            .map_err(|_| ParseError::InvalidTime(time.to_string()))?;
        let duration_secs = duration
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|d| *d >= 0)
            .ok_or_else(|| ParseError::InvalidDuration(duration.to_string()))?;

        let quoted = label.strip_prefix('"').ok_or(ParseError::UnquotedLabel)?;
        let end = quoted.find('"').ok_or(ParseError::UnquotedLabel)?;

        Ok(Self {
            date,
            start_time,
            duration_secs,
            label: quoted[..end].to_string(),
        })
    }

    /// Wall-clock end of the session (start + duration, wrapping past midnight)
    pub fn end_time(&self) -> NaiveTime {
        let within_day = self.duration_secs.rem_euclid(SECS_PER_DAY);
        let (end, _) = self
            .start_time
            .overflowing_add_signed(Duration::seconds(within_day));
        end
    }
}

impl fmt::Display for SessionLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},\"{}\"",
            self.date.format(DATE_FORMAT),
            self.start_time.format(TIME_FORMAT),
            self.duration_secs,
            self.label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_valid_line() {
        let entry = SessionLogEntry::parse("2026-03-14,09:30,1500,\"Write report\"\n").unwrap();
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        assert_eq!(entry.start_time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(entry.duration_secs, 1500);
        assert_eq!(entry.label, "Write report");
    }

    #[test]
    fn test_label_may_contain_commas() {
        let entry = SessionLogEntry::parse("2026-03-14,09:30,60,\"a, b, c\"").unwrap();
        assert_eq!(entry.label, "a, b, c");
    }

    #[test]
    fn test_rejects_missing_fields() {
        assert_eq!(SessionLogEntry::parse(""), Err(ParseError::MissingField("date")));
        assert_eq!(
            SessionLogEntry::parse("2026-03-14,09:30"),
            Err(ParseError::MissingField("duration"))
        );
        assert_eq!(
            SessionLogEntry::parse("2026-03-14,09:30,60"),
            Err(ParseError::MissingField("label"))
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SessionLogEntry::parse("yesterday,09:30,60,\"x\""),
            Err(ParseError::InvalidDate(_))
        ));
        assert!(matches!(
            SessionLogEntry::parse("2026-03-14,9h30,60,\"x\""),
            Err(ParseError::InvalidTime(_))
        ));
        assert!(matches!(
            SessionLogEntry::parse("2026-03-14,09:30,-5,\"x\""),
            Err(ParseError::InvalidDuration(_))
        ));
        assert_eq!(
            SessionLogEntry::parse("2026-03-14,09:30,60,x"),
            Err(ParseError::UnquotedLabel)
        );
        assert_eq!(
            SessionLogEntry::parse("2026-03-14,09:30,60,\"open"),
            Err(ParseError::UnquotedLabel)
        );
    }

    #[test]
    fn test_display_matches_file_format() {
        let start = Local.with_ymd_and_hms(2026, 1, 5, 14, 7, 42).unwrap();
        let entry = SessionLogEntry::new(start, 1499, "Deep work");
        assert_eq!(entry.to_string(), "2026-01-05,14:07,1499,\"Deep work\"");
        assert_eq!(SessionLogEntry::parse(&entry.to_string()).unwrap(), entry);
    }

    #[test]
    fn test_end_time() {
        let entry = SessionLogEntry::parse("2026-03-14,23:50,1500,\"late\"").unwrap();
        assert_eq!(entry.end_time(), NaiveTime::from_hms_opt(0, 15, 0).unwrap());
    }

    #[test]
    fn test_end_time_with_huge_duration() {
        let entry = SessionLogEntry::parse("2026-03-14,09:30,9223372036854775807,\"x\"").unwrap();
        assert_eq!(entry.duration_secs, i64::MAX);
        // i64::MAX % 86400 = 55807 s = 15:30:07
        assert_eq!(entry.end_time(), NaiveTime::from_hms_opt(1, 0, 7).unwrap());

        let two_days = SessionLogEntry::parse("2026-03-14,09:30,172860,\"x\"").unwrap();
        assert_eq!(two_days.end_time(), NaiveTime::from_hms_opt(9, 31, 0).unwrap());
    }
}
