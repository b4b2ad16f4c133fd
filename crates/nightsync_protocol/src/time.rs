//! Wire timestamp format.
//!
//! Nightscout stores and filters timestamps as ISO-8601 UTC strings with
//! millisecond precision, e.g. `2026-10-18T08:30:00.000Z`. Filters compare
//! these strings, so every timestamp this crate emits uses exactly that form.

use crate::error::{ProtocolError, ProtocolResult};
use chrono::{DateTime, SecondsFormat, Utc};

/// Formats a timestamp as ISO-8601 UTC with fractional seconds.
pub fn format_iso8601(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses any RFC 3339 timestamp and normalizes it to UTC.
pub fn parse_iso8601(value: &str) -> ProtocolResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ProtocolError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Serde adapter for `DateTime<Utc>` fields in the wire format.
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serializes with [`format_iso8601`](super::format_iso8601).
    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_iso8601(at))
    }

    /// Deserializes with [`parse_iso8601`](super::parse_iso8601).
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso8601(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_with_millis_and_z() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 8, 30, 0).unwrap();
        assert_eq!(format_iso8601(&at), "2026-10-18T08:30:00.000Z");

        let at = at + chrono::Duration::milliseconds(42);
        assert_eq!(format_iso8601(&at), "2026-10-18T08:30:00.042Z");
    }

    #[test]
    fn parses_offsets_into_utc() {
        let parsed = parse_iso8601("2026-10-18T10:30:00+02:00").unwrap();
        assert_eq!(format_iso8601(&parsed), "2026-10-18T08:30:00.000Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_iso8601("18/10/2026"),
            Err(ProtocolError::InvalidTimestamp { .. })
        ));
    }
}
