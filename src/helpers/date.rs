//! Date helper functions

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Short calendar date, en-US style: "Jan 5, 2024"
const SHORT_DATE: &str = "%b %-d, %Y";

/// Format epoch seconds as a short calendar date in UTC
///
/// # Examples
/// ```
/// assert_eq!(postkit::helpers::format_date(1704412800), "Jan 5, 2024");
/// ```
pub fn format_date(timestamp: i64) -> String {
    format_date_in(timestamp, &Tz::UTC)
}

/// Format epoch seconds as a short calendar date in the given timezone
pub fn format_date_in(timestamp: i64, tz: &Tz) -> String {
    from_timestamp(timestamp)
        .with_timezone(tz)
        .format(SHORT_DATE)
        .to_string()
}

/// Format epoch seconds in ISO 8601 / XML format
pub fn date_xml(timestamp: i64, tz: &Tz) -> String {
    from_timestamp(timestamp)
        .with_timezone(tz)
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}

/// Convert epoch seconds, clamping to chrono's representable range
fn from_timestamp(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or(if timestamp < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}
