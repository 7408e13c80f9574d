use chrono::{DateTime, Duration, FixedOffset, Local};
use serde::Serialize;
use tracing::debug;

use super::parse_offset;

/// Source of the current wall-clock time for degraded timestamps
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The local system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Absolute time of a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum Timestamp {
    /// Meeting start + transcript offset - anchor correction
    Anchored(DateTime<FixedOffset>),
    /// Best-effort "now + offset", used when there is no anchor or the offset is malformed
    Approximate(DateTime<FixedOffset>),
}

impl Timestamp {
    pub fn at(&self) -> DateTime<FixedOffset> {
        match self {
            Timestamp::Anchored(at) | Timestamp::Approximate(at) => *at,
        }
    }

    pub fn is_approximate(&self) -> bool {
        matches!(self, Timestamp::Approximate(_))
    }

    /// Signed time elapsed from `earlier` to this timestamp
    pub fn since(&self, earlier: &Timestamp) -> Duration {
        self.at() - earlier.at()
    }
}

/// Resolve a transcript offset against the meeting anchor
///
/// `correction` is the transcript offset of the meeting-start line itself.
pub fn resolve(
    anchor: Option<DateTime<FixedOffset>>,
    correction: Duration,
    raw_offset: &str,
    clock: &dyn Clock,
) -> Timestamp {
    let parsed = parse_offset(raw_offset);

    if let (Some(anchor), Ok(offset)) = (anchor, &parsed) {
        if let Some(at) = anchor.checked_add_signed(*offset - correction) {
            return Timestamp::Anchored(at);
        }
    }

    let offset = match parsed {
        Ok(offset) => offset,
        Err(err) => {
            debug!("{}; falling back to wall-clock time", err);
            Duration::zero()
        }
    };
    let now = clock.now();
    Timestamp::Approximate(now.checked_add_signed(offset).unwrap_or(now))
}
