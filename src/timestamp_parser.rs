use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Handles parsing timestamps from the formats found in request logs
pub struct TimestampParser;

impl TimestampParser {
    /// Parse a timestamp string into a DateTime<Utc>
    /// A trailing Z means UTC, and a timestamp without an offset is assumed to be UTC
    pub fn parse(timestamp_str: &str) -> Result<DateTime<Utc>> {
        let trimmed = timestamp_str.trim();
        let timestamp = match trimmed.strip_suffix('Z') {
            Some(rest) => format!("{rest}+00:00"),
            None => trimmed.to_string(),
        };

        // Try parsing as RFC 3339 first
        if let Ok(dt) = DateTime::parse_from_rfc3339(&timestamp) {
            return Ok(dt.with_timezone(&Utc));
        }

        // Offsets written without a colon or with a space separator
        for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
            if let Ok(dt) = DateTime::parse_from_str(&timestamp, format) {
                return Ok(dt.with_timezone(&Utc));
            }
        }

        // Try parsing as naive datetime and assume UTC
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&timestamp, format) {
                return Ok(naive.and_utc());
            }
        }

        if let Some(midnight) = NaiveDate::parse_from_str(&timestamp, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(midnight.and_utc());
        }

        anyhow::bail!("Failed to parse timestamp: {}", timestamp_str)
    }

    /// Calendar date of an instant in the local system timezone
    pub fn to_local_date(instant: &DateTime<Utc>) -> NaiveDate {
        Self::to_date_in(instant, &Local)
    }

    /// Calendar date of an instant in an explicit timezone
    pub fn to_date_in<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
        instant.with_timezone(tz).date_naive()
    }
}
