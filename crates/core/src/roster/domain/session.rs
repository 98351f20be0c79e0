use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded group-photo capture. Immutable once appended.
///
/// Participants are referenced by name only; a name may outlive the member
/// it once belonged to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub participants: Vec<String>,
    pub photo: String,
    pub caption: String,
    pub timestamp: DateTime<Utc>,
}

impl Session {
    pub fn new(
        participants: Vec<String>,
        photo: impl Into<String>,
        caption: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            participants,
            photo: photo.into(),
            caption: caption.into(),
            timestamp,
        }
    }

    /// Distinct participant names in lexical order.
    pub fn participant_set(&self) -> BTreeSet<&str> {
        self.participants.iter().map(String::as_str).collect()
    }
}
