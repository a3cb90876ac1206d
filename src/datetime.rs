use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// How much detail a rendered show time carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `Tuesday May, 21, 2019 at 9:30PM`
    Full,
    /// `Tue 05, 21, 2019 9:30PM`
    #[default]
    Medium,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
            DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a recognizable date/time")]
pub struct TimestampError(pub String);

const NAIVE_PATTERNS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse the timestamp shapes produced by forms and by the store.
///
/// Offsets in RFC 3339 input are kept as wall-clock time in that offset.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TimestampError> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_local());
    }

    NAIVE_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(value, pattern).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| TimestampError(value.to_owned()))
}

pub fn format_timestamp(timestamp: NaiveDateTime, format: DateFormat) -> String {
    timestamp.format(format.pattern()).to_string()
}

/// Render a raw timestamp string as English text.
pub fn format_datetime(value: &str, format: DateFormat) -> Result<String, TimestampError> {
    parse_timestamp(value).map(|timestamp| format_timestamp(timestamp, format))
}
