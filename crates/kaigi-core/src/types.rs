use serde::{Deserialize, Serialize};

/// Meeting identifier without database dependencies.
///
/// Doubles as the iCalendar UID: it is assigned once at creation and
/// never regenerated, so invitation, update, and cancellation documents
/// for the same meeting correlate on the receiving client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(String);

impl MeetingId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MeetingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<uuid::Uuid> for MeetingId {
    fn from(id: uuid::Uuid) -> Self {
        Self(id.to_string())
    }
}
