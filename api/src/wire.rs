//! Wire helpers for formats the backend is loose about.

/// Match dates travel as ISO-8601 without an offset. Responses may also carry
/// an RFC 3339 offset (normalised to UTC) or a bare date (midnight).
pub mod datetime {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date-time: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn parses_naive_with_and_without_fraction() {
            let a = parse("2024-05-01T18:30:00").unwrap();
            let b = parse("2024-05-01T18:30:00.000").unwrap();
            assert_eq!(a, b);
        }

        #[test]
        fn offset_is_normalised_to_utc() {
            let dt = parse("2024-05-01T20:30:00+02:00").unwrap();
            assert_eq!(dt.format(FORMAT).to_string(), "2024-05-01T18:30:00");
        }

        #[test]
        fn bare_date_is_midnight() {
            let dt = parse("2024-05-01").unwrap();
            assert_eq!(dt.format(FORMAT).to_string(), "2024-05-01T00:00:00");
        }

        #[test]
        fn garbage_is_rejected() {
            assert!(parse("next tuesday").is_none());
        }
    }
}
