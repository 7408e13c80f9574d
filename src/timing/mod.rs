pub mod anchor;
pub mod clock;
pub mod offset;

pub use anchor::*;
pub use clock::*;
pub use offset::*;

/// Line-level time parsing failures
///
/// Neither is fatal: the builder absorbs both and degrades to an approximate
/// timestamp or an unset meeting start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    #[error("malformed transcript offset {0:?} (expected H:M:S)")]
    MalformedOffset(String),
    #[error("malformed meeting start timestamp {0:?} (expected YYYY-MM-DDThh:mmZONE)")]
    MalformedTimestamp(String),
}
