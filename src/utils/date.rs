//! Date helpers for CMS timestamps.
//!
//! The CMS emits RFC 3339 timestamps (`2025-03-14T08:30:00.000Z`).

use crate::locale::Locale;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Parse a CMS timestamp, accepting a bare `YYYY-MM-DD` as well.
pub fn parse_timestamp(s: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// W3C date (`YYYY-MM-DD`) of a timestamp, or today's date if it does not parse.
pub fn w3c_date(s: &str) -> String {
    parse_timestamp(s)
        .unwrap_or_else(|| Utc::now().date_naive())
        .format("%Y-%m-%d")
        .to_string()
}

/// Long human date in the locale's convention.
///
/// - `id`: `14 Maret 2025`
/// - `en`: `March 14, 2025`
///
/// Unparseable input is returned unchanged.
pub fn long_date(s: &str, locale: Locale) -> String {
    let Some(date) = parse_timestamp(s) else {
        return s.to_owned();
    };
    let month = locale.strings().months[date.month0() as usize];
    match locale {
        Locale::Id => format!("{} {month} {}", date.day(), date.year()),
        Locale::En => format!("{month} {}, {}", date.day(), date.year()),
    }
}
