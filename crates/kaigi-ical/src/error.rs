use thiserror::Error;

/// iCalendar generation errors.
///
/// An unresolvable time zone is the only hard failure in document
/// generation: with a wrong zone every timestamp in the document is
/// wrong, so there is no best-effort fallback. Malformed recurrence
/// metadata never errors; it degrades to a smaller rule or a
/// non-recurring occurrence list upstream.
#[derive(Error, Debug)]
pub enum IcalError {
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

pub type IcalResult<T> = std::result::Result<T, IcalError>;
