//! Pure text parsers for the fields the pipeline interprets.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::ParseError;

/// Minutes are converted to fractional hours with this divisor.
pub const MINUTES_PER_HOUR: f64 = 60.0;

// ---------------------------------------------------------------------------
// Duration: "H:MM" → fractional hours
// ---------------------------------------------------------------------------

/// Convert `H:MM` duration text to hours, e.g. `"10:20"` → `10.333…`.
///
/// Hours may have any number of digits. Minutes of 60 or more are not
/// normalised; they are divided by 60 like any other value.
pub fn text_to_duration(text: &str) -> Result<f64, ParseError> {
    let text = text.trim();
    let mut parts = text.split(':');
    let hours = parts.next().unwrap_or_default();
    let minutes = parts
        .next()
        .ok_or_else(|| ParseError::MissingSeparator(text.to_string()))?;
    if parts.next().is_some() {
        return Err(ParseError::TooManySeparators(text.to_string()));
    }

    let hours = parse_component("hours", hours)?;
    let minutes = parse_component("minutes", minutes)?;
    Ok(hours as f64 + minutes as f64 / MINUTES_PER_HOUR)
}

fn parse_component(part: &'static str, text: &str) -> Result<u32, ParseError> {
    let text = text.trim();
    // `u32::from_str` accepts a leading '+', which is not a duration digit.
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidNumber {
            part,
            text: text.to_string(),
        });
    }
    text.parse().map_err(|_| ParseError::InvalidNumber {
        part,
        text: text.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Crew: "A; B;" → 2
// ---------------------------------------------------------------------------

/// Count crew members in `;`-terminated crew text.
///
/// Every name is followed by a `;`, so the member count is the number of
/// segments minus the empty one after the last separator. Blank text has no
/// crew at all and yields `None`. Text missing the trailing `;` undercounts
/// by one; see [`has_trailing_separator`].
pub fn calculate_crew_size(crew: &str) -> Option<usize> {
    if crew.trim().is_empty() {
        return None;
    }
    Some(crew.split(';').count() - 1)
}

/// Whether non-blank crew text ends with the `;` the count relies on.
pub fn has_trailing_separator(crew: &str) -> bool {
    let crew = crew.trim();
    crew.is_empty() || crew.ends_with(';')
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse an ISO-8601 style date or datetime. Offsets are normalised to UTC.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Interpret a numeric date as milliseconds since the Unix epoch.
pub fn date_from_epoch_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}
