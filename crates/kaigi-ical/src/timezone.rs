//! Timezone resolution and local wall-clock conversion.
//!
//! Documents always qualify DTSTART/DTEND/EXDATE/RECURRENCE-ID with
//! the meeting's TZID, so an unresolvable zone must hard-fail before
//! any timestamp is rendered.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::error::{IcalError, IcalResult};

/// ## Summary
/// Resolves a timezone identifier to a `chrono_tz::Tz`.
///
/// Accepts IANA names and a few common vendor-prefixed spellings seen
/// in stored meeting records.
///
/// ## Errors
/// Returns `IcalError::UnknownTimezone` if the identifier cannot be
/// resolved. This aborts document generation: a wrong zone would
/// silently corrupt every timestamp in the document.
pub fn resolve(tzid: &str) -> IcalResult<Tz> {
    let normalized = normalize_tzid(tzid);
    Tz::from_str(normalized).map_err(|_e| IcalError::UnknownTimezone(tzid.to_string()))
}

/// Strips vendor prefixes some calendar clients attach to TZIDs.
fn normalize_tzid(tzid: &str) -> &str {
    tzid.strip_prefix("/mozilla.org/")
        .or_else(|| tzid.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(tzid)
}

/// Converts a stored absolute instant into the naive local wall-clock
/// time of the given zone. Total: UTC to zone conversion has no DST
/// gaps or folds.
#[must_use]
pub fn to_local(instant: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}
