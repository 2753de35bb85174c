use serde::{Deserialize, Deserializer, Serializer};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// Deserialize an RFC 3339 formatted string into an OffsetDateTime
pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    OffsetDateTime::parse(&s, &Rfc3339).map_err(serde::de::Error::custom)
}

/// Serialize an OffsetDateTime into an RFC 3339 formatted string
pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = datetime
        .format(&Rfc3339)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&s)
}

/// Format the hour and minute of a timestamp, e.g. `09:05`.
pub fn format_clock(datetime: &OffsetDateTime) -> String {
    datetime
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| "--:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(&datetime!(2024-03-01 09:05:59 UTC)), "09:05");
        assert_eq!(format_clock(&datetime!(2024-03-01 23:45:00 UTC)), "23:45");
    }
}
