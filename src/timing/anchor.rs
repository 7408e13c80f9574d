use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

use super::TimeError;

/// Date and time part of the meeting start token, before the zone abbreviation
const START_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Zone abbreviations with a known UTC offset in hours
const KNOWN_ZONES: &[(&str, f64)] = &[
    ("UTC", 0.0),
    ("GMT", 0.0),
    ("Z", 0.0),
    ("EST", -5.0),
    ("EDT", -4.0),
    ("CST", -6.0),
    ("CDT", -5.0),
    ("MST", -7.0),
    ("MDT", -6.0),
    ("PST", -8.0),
    ("PDT", -7.0),
    ("CET", 1.0),
    ("CEST", 2.0),
    ("BST", 1.0),
    ("IST", 5.5),
    ("JST", 9.0),
    ("AEST", 10.0),
    ("AEDT", 11.0),
];

/// UTC offset for a zone abbreviation
///
/// Unrecognized abbreviations are treated as zero-offset labels.
pub fn zone_offset(abbreviation: &str) -> FixedOffset {
    let seconds = KNOWN_ZONES
        .iter()
        .find(|(name, _)| *name == abbreviation)
        .map(|(_, hours)| (hours * 3600.0) as i32)
        .unwrap_or(0);
    FixedOffset::east_opt(seconds).unwrap_or(Utc.fix())
}

/// Parse a meeting start token such as `2024-01-01T09:00UTC`
///
/// The zone is `Z` or an uppercase abbreviation of three or more letters.
pub fn parse_start_timestamp(token: &str) -> Result<DateTime<FixedOffset>, TimeError> {
    let malformed = || TimeError::MalformedTimestamp(token.to_string());

    let split = token.trim_end_matches(|c: char| c.is_ascii_uppercase()).len();
    let (stamp, zone) = token.split_at(split);
    if zone != "Z" && zone.len() < 3 {
        return Err(malformed());
    }

    let naive = NaiveDateTime::parse_from_str(stamp, START_FORMAT).map_err(|_| malformed())?;
    zone_offset(zone)
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(malformed)
}
