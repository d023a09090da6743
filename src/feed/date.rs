use chrono::{DateTime, Utc};

use crate::xml::RenderError;

/// RFC-822 date pattern used by RSS 2.0 (`Tue, 03 Jun 2025 10:00:00 +0000`).
const RSS_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Formats a point in time for `pubDate` / `lastBuildDate`.
///
/// Always rendered in UTC with English day and month names, independent of
/// the host locale and timezone.
pub fn format_rss_date(date: &DateTime<Utc>) -> String {
    date.format(RSS_DATE_FORMAT).to_string()
}

/// Converts Unix seconds into a UTC timestamp.
///
/// # Errors
///
/// [`RenderError::InvalidTimestamp`] when `seconds` is outside chrono's range.
pub fn timestamp_to_datetime(seconds: i64) -> Result<DateTime<Utc>, RenderError> {
    DateTime::from_timestamp(seconds, 0).ok_or(RenderError::InvalidTimestamp(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_known_date() {
        let date = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();
        assert_eq!(format_rss_date(&date), "Tue, 03 Jun 2025 10:00:00 +0000");
    }

    #[test]
    fn test_format_epoch() {
        let date = timestamp_to_datetime(0).unwrap();
        assert_eq!(format_rss_date(&date), "Thu, 01 Jan 1970 00:00:00 +0000");
    }

    #[test]
    fn test_timestamp_conversion() {
        let date = timestamp_to_datetime(1_700_000_000).unwrap();
        assert_eq!(format_rss_date(&date), "Tue, 14 Nov 2023 22:13:20 +0000");
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let result = timestamp_to_datetime(i64::MAX);
        assert!(matches!(result, Err(RenderError::InvalidTimestamp(i64::MAX))));
    }
}
