//! Types shared by several WordPress models.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Serde helpers for WordPress timestamps.
///
/// WordPress emits RFC 3339 timestamps on `date` and `modified`, but the
/// `*_gmt` variants and older endpoints omit the offset. Both forms are read
/// as UTC; values are written back as RFC 3339.
pub mod wp_datetime {
    use super::{DateTime, Deserialize, Deserializer, NaiveDateTime, Serializer, TimeZone, Utc};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    /// Parses a WordPress timestamp.
    #[must_use]
    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(value, NAIVE_FORMAT)
                    .ok()
                    .map(|naive| Utc.from_utc_datetime(&naive))
            })
    }

    /// Serializes an optional timestamp as RFC 3339.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional timestamp.
    ///
    /// Empty strings and WordPress's zero date read as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-empty string that is not a timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("" | "0000-00-00T00:00:00" | "0000-00-00 00:00:00") => Ok(None),
            Some(value) => parse(value)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid WordPress date '{value}'"))),
        }
    }
}
