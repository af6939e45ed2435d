//! Serde helpers for the loosely typed fields the backend emits.

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default value
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional timestamps that may arrive as RFC 3339, as a naive ISO
/// date-time, or as a bare date. Always serialized as a naive date-time.
pub mod lenient_datetime {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("unrecognized timestamp: {raw}"))),
        }
    }

    /// Parse any of the accepted timestamp shapes
    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_shapes() {
            let expected = NaiveDate::from_ymd_opt(2025, 1, 15)
                .and_then(|d| d.and_hms_opt(9, 30, 0))
                .unwrap();
            assert_eq!(parse("2025-01-15T09:30:00"), Some(expected));
            assert_eq!(parse("2025-01-15T09:30:00.000"), Some(expected));
            assert_eq!(parse("2025-01-15T09:30:00Z"), Some(expected));
            assert_eq!(parse("2025-01-15T11:30:00+02:00"), Some(expected));
            assert_eq!(
                parse("2025-01-15"),
                NaiveDate::from_ymd_opt(2025, 1, 15).and_then(|d| d.and_hms_opt(0, 0, 0))
            );
            assert_eq!(parse("next tuesday"), None);
        }
    }
}
