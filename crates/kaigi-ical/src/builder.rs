//! Calendar document assembly.
//!
//! All four document variants (invitation, update, series
//! cancellation, single-occurrence cancellation) share one assembly
//! routine parameterized by [`DocumentIntent`], so the shared
//! invariants hold in one place: the UID is always the meeting id,
//! DTSTAMP is always the generation instant, and every local timestamp
//! carries the meeting's TZID.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use kaigi_core::constants::{CALENDAR_PRODID, REMINDER_LEAD_MINUTES};
use kaigi_core::meeting::{Attachment, Meeting};

use crate::build::serialize;
use crate::core::{Component, Parameter, Property};
use crate::error::IcalResult;
use crate::rrule::{format_utc, to_rrule};
use crate::timezone;

/// What a generated document is meant to do on the receiving client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentIntent {
    /// Invitation or update (METHOD:REQUEST). The caller supplies the
    /// sequence: 0 for the first send, strictly greater than the last
    /// sent value for updates.
    Request { sequence: i64 },
    /// Cancels the whole series (METHOD:CANCEL).
    CancelSeries { sequence: i64 },
    /// Cancels one occurrence, identified by its original start
    /// instant, leaving the rest of the series intact.
    CancelOccurrence {
        sequence: i64,
        occurrence_start: DateTime<Utc>,
    },
}

impl DocumentIntent {
    const fn method(self) -> &'static str {
        match self {
            Self::Request { .. } => "REQUEST",
            Self::CancelSeries { .. } | Self::CancelOccurrence { .. } => "CANCEL",
        }
    }

    const fn status(self) -> &'static str {
        match self {
            Self::Request { .. } => "CONFIRMED",
            Self::CancelSeries { .. } | Self::CancelOccurrence { .. } => "CANCELLED",
        }
    }

    const fn sequence(self) -> i64 {
        match self {
            Self::Request { sequence }
            | Self::CancelSeries { sequence }
            | Self::CancelOccurrence { sequence, .. } => sequence,
        }
    }

    const fn is_cancellation(self) -> bool {
        matches!(self, Self::CancelSeries { .. } | Self::CancelOccurrence { .. })
    }
}

/// ## Summary
/// Generates an invitation document for a meeting.
///
/// ## Errors
/// Fails only if the meeting's timezone identifier cannot be resolved.
pub fn invitation(meeting: &Meeting) -> IcalResult<String> {
    build_document(
        meeting,
        DocumentIntent::Request {
            sequence: meeting.sequence,
        },
        Utc::now(),
    )
}

/// ## Summary
/// Generates an update document. `sequence` must be strictly greater
/// than the last sent value for this meeting; the caller tracks it.
///
/// ## Errors
/// Fails only if the meeting's timezone identifier cannot be resolved.
pub fn update(meeting: &Meeting, sequence: i64) -> IcalResult<String> {
    build_document(meeting, DocumentIntent::Request { sequence }, Utc::now())
}

/// ## Summary
/// Generates a full-series cancellation document.
///
/// ## Errors
/// Fails only if the meeting's timezone identifier cannot be resolved.
pub fn series_cancellation(meeting: &Meeting, sequence: i64) -> IcalResult<String> {
    build_document(meeting, DocumentIntent::CancelSeries { sequence }, Utc::now())
}

/// ## Summary
/// Generates a cancellation document for a single occurrence of a
/// recurring meeting.
///
/// ## Errors
/// Fails only if the meeting's timezone identifier cannot be resolved.
pub fn occurrence_cancellation(
    meeting: &Meeting,
    sequence: i64,
    occurrence_start: DateTime<Utc>,
) -> IcalResult<String> {
    build_document(
        meeting,
        DocumentIntent::CancelOccurrence {
            sequence,
            occurrence_start,
        },
        Utc::now(),
    )
}

/// ## Summary
/// Assembles a complete calendar document for the given intent.
///
/// `generated_at` becomes the DTSTAMP; the convenience wrappers pass
/// the current instant, tests may pin it for byte-identical output.
///
/// ## Errors
/// Returns `IcalError::UnknownTimezone` if the meeting's timezone
/// identifier cannot be resolved.
pub fn build_document(
    meeting: &Meeting,
    intent: DocumentIntent,
    generated_at: DateTime<Utc>,
) -> IcalResult<String> {
    let tz = timezone::resolve(&meeting.timezone)?;

    tracing::debug!(
        meeting = %meeting.id,
        method = intent.method(),
        sequence = intent.sequence(),
        "Building calendar document"
    );

    let mut calendar = Component::calendar();
    calendar.add_property(Property::text("VERSION", "2.0"));
    calendar.add_property(Property::text("PRODID", CALENDAR_PRODID));
    calendar.add_property(Property::text("CALSCALE", "GREGORIAN"));
    calendar.add_property(Property::text("METHOD", intent.method()));

    // VTIMEZONE stub: carries the TZID, clients resolve the IANA zone.
    let mut vtimezone = Component::timezone();
    vtimezone.add_property(Property::text("TZID", &meeting.timezone));
    calendar.add_child(vtimezone);

    let mut event = Component::event();
    event.add_property(Property::text("UID", meeting.id.as_str()));
    event.add_property(Property::raw("DTSTAMP", format_utc(generated_at)));
    event.add_property(zoned(
        "DTSTART",
        meeting.start_time,
        tz,
        &meeting.timezone,
    ));
    event.add_property(zoned(
        "DTEND",
        meeting.first_end_time(),
        tz,
        &meeting.timezone,
    ));
    event.add_property(Property::integer("SEQUENCE", intent.sequence()));
    event.add_property(Property::text("STATUS", intent.status()));

    let summary = if intent.is_cancellation() {
        format!("{} (CANCELLED)", meeting.topic)
    } else {
        meeting.topic.clone()
    };
    event.add_property(Property::text("SUMMARY", summary));

    let description = compose_description(meeting);
    if !description.is_empty() {
        event.add_property(Property::text("DESCRIPTION", description));
    }

    match intent {
        DocumentIntent::Request { .. } => {
            if let Some(recurrence) = &meeting.recurrence {
                event.add_property(Property::raw("RRULE", to_rrule(recurrence)));
                if let Some(exdate) = exdate_value(meeting, tz) {
                    event.add_property(
                        Property::raw("EXDATE", exdate)
                            .with_param(Parameter::tzid(&meeting.timezone)),
                    );
                }
            }
            event.add_child(reminder_alarm());
        }
        DocumentIntent::CancelSeries { .. } => {
            // The rule only identifies which series is cancelled.
            if let Some(recurrence) = &meeting.recurrence {
                event.add_property(Property::raw("RRULE", to_rrule(recurrence)));
            }
        }
        DocumentIntent::CancelOccurrence {
            occurrence_start, ..
        } => {
            event.add_property(zoned(
                "RECURRENCE-ID",
                occurrence_start,
                tz,
                &meeting.timezone,
            ));
        }
    }

    calendar.add_child(event);
    Ok(serialize(&calendar))
}

/// TZID-qualified local date-time property.
fn zoned(name: &str, instant: DateTime<Utc>, tz: Tz, tzid: &str) -> Property {
    Property::raw(name, format_local(timezone::to_local(instant, tz)))
        .with_param(Parameter::tzid(tzid))
}

fn format_local(local: NaiveDateTime) -> String {
    local.format("%Y%m%dT%H%M%S").to_string()
}

/// Single comma-joined EXDATE value, sorted so regenerated documents
/// stay byte-stable. `None` when no occurrence has been cancelled.
fn exdate_value(meeting: &Meeting, tz: Tz) -> Option<String> {
    if meeting.cancelled_occurrences.is_empty() {
        return None;
    }
    let mut instants = meeting.cancelled_occurrences.clone();
    instants.sort_unstable();
    let joined = instants
        .iter()
        .map(|&instant| format_local(timezone::to_local(instant, tz)))
        .collect::<Vec<_>>()
        .join(",");
    Some(joined)
}

/// Display reminder fired shortly before the occurrence start.
fn reminder_alarm() -> Component {
    let mut alarm = Component::alarm();
    alarm.add_property(Property::text("ACTION", "DISPLAY"));
    alarm.add_property(Property::text("DESCRIPTION", "Reminder"));
    alarm.add_property(Property::raw(
        "TRIGGER",
        format!("-PT{REMINDER_LEAD_MINUTES}M"),
    ));
    alarm
}

/// Composes the invitation body: project name, attachments, free-text
/// description, join link, dial-in details, direct-join fallback.
/// Every block is included only when non-empty.
fn compose_description(meeting: &Meeting) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if !meeting.project_name.is_empty() {
        blocks.push(format!("Project: {}", meeting.project_name));
    }

    if !meeting.attachments.is_empty() {
        let mut lines = vec!["Attachments:".to_string()];
        for attachment in &meeting.attachments {
            match attachment {
                // Raw URL so mail clients keep the link clickable.
                Attachment::Link { title, url } => {
                    if title.is_empty() {
                        lines.push(url.clone());
                    } else {
                        lines.push(format!("{title}: {url}"));
                    }
                }
                Attachment::File { name, filename } => {
                    lines.push(format!("{name} ({filename}) - use the join link to download"));
                }
            }
        }
        blocks.push(lines.join("\n"));
    }

    if !meeting.description.is_empty() {
        blocks.push(meeting.description.clone());
    }

    if !meeting.join_link.is_empty() {
        blocks.push(format!("Join link: {}", meeting.join_link));
    }

    let mut dial_in = Vec::new();
    if !meeting.dial_in_id.is_empty() {
        dial_in.push(format!("Dial-in ID: {}", meeting.dial_in_id));
    }
    if !meeting.passcode.is_empty() {
        dial_in.push(format!("Passcode: {}", meeting.passcode));
    }
    if !meeting.fallback_link.is_empty() {
        dial_in.push(format!("Or join directly: {}", meeting.fallback_link));
    }
    if !dial_in.is_empty() {
        blocks.push(dial_in.join("\n"));
    }

    blocks.join("\n\n")
}
