use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Current UTC time as an RFC 3339 string, the format every stored
/// timestamp uses.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}

/// Current UTC time in milliseconds since the Unix epoch.
pub fn now_epoch_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_rfc3339_parses_back() {
        let stamp = now_rfc3339();
        assert!(OffsetDateTime::parse(&stamp, &Rfc3339).is_ok());
    }

    #[test]
    fn test_now_epoch_millis_is_recent() {
        // Sanity bound: after 2020-01-01 and before 2100-01-01.
        let millis = now_epoch_millis();
        assert!(millis > 1_577_836_800_000);
        assert!(millis < 4_102_444_800_000);
    }
}
