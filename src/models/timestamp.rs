use chrono::{DateTime, Locale, NaiveDateTime};

/// Formats accepted for event times: `datetime-local` input values with or
/// without seconds, and full RFC 3339.
const LOCAL_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

const DISPLAY_FORMAT: &str = "%d %B %Y, %H:%M uur";

/// Parses an event timestamp into its wall-clock time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Renders a timestamp as e.g. `01 januari 2024, 10:00 uur`. Values that do
/// not parse are shown as stored.
pub fn format_timestamp(value: &str) -> String {
    match parse_timestamp(value) {
        Some(naive) => naive
            .and_utc()
            .format_localized(DISPLAY_FORMAT, Locale::nl_NL)
            .to_string(),
        None => value.to_string(),
    }
}
