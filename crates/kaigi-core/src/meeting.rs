//! Meeting records as supplied by the persistence layer.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::recurrence::Recurrence;
use crate::types::MeetingId;

/// Something attached to a meeting and listed in the invitation body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Attachment {
    /// External link, rendered as a raw URL so mail clients keep it clickable.
    Link { title: String, url: String },
    /// Uploaded file, listed by display name and stored filename.
    /// Recipients download it through the meeting join link.
    File { name: String, filename: String },
}

/// A scheduled meeting, recurring or not.
///
/// `sequence` is the RFC 5545 revision counter for this meeting's
/// calendar documents. The persistence layer bumps it before every
/// update or cancellation send; this crate only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub topic: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project_name: String,

    pub start_time: DateTime<Utc>,
    /// Scheduled length of each occurrence, in minutes.
    pub duration_minutes: u32,
    /// IANA time zone identifier the meeting was scheduled in.
    pub timezone: String,

    #[serde(default)]
    pub join_link: String,
    #[serde(default)]
    pub dial_in_id: String,
    #[serde(default)]
    pub passcode: String,
    /// Direct-join fallback for clients that cannot follow the join link.
    #[serde(default)]
    pub fallback_link: String,

    #[serde(default)]
    pub attachments: Vec<Attachment>,

    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub sequence: i64,

    /// Original start instants of occurrences cancelled out-of-band.
    /// Excluded from generated documents via EXDATE.
    #[serde(default)]
    pub cancelled_occurrences: Vec<DateTime<Utc>>,
}

impl Meeting {
    /// Returns whether this meeting repeats.
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Scheduled length of each occurrence.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.duration_minutes))
    }

    /// End instant of the first occurrence's scheduled window.
    #[must_use]
    pub fn first_end_time(&self) -> DateTime<Utc> {
        self.start_time + self.duration()
    }
}
