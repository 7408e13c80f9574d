use chrono::Duration;

use super::TimeError;

/// Seconds per component of an `H:M:S` offset
const COMPONENT_SECONDS: [i64; 3] = [3600, 60, 1];

/// Parse a transcript offset (`H:M:S`, plain base-10 integers of any width)
/// into the duration elapsed since transcript start
pub fn parse_offset(raw: &str) -> Result<Duration, TimeError> {
    let malformed = || TimeError::MalformedOffset(raw.to_string());

    let parts: Vec<&str> = raw.trim().split(':').collect();
    if parts.len() != COMPONENT_SECONDS.len() {
        return Err(malformed());
    }

    let mut total: i64 = 0;
    for (part, unit) in parts.iter().zip(COMPONENT_SECONDS) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let value: u32 = part.parse().map_err(|_| malformed())?;
        total += i64::from(value) * unit;
    }

    Ok(Duration::seconds(total))
}
