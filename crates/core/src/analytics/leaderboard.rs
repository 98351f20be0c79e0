use std::cmp::Reverse;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::roster::domain::member::Member;
use crate::roster::domain::session::Session;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub count: usize,
    /// Enrollment photo of the current member with this name, if any.
    pub photo: Option<String>,
}

/// Ranks names by the number of sessions they appear in.
///
/// Sorted by count descending, then name ascending. Names that no longer
/// belong to a current member still rank, without a photo. Empty names are
/// ignored; any other name counts, whitespace included.
pub fn leaderboard(sessions: &[Session], members: &[Member]) -> Vec<LeaderboardEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for session in sessions {
        for name in session.participant_set() {
            if name.is_empty() {
                continue;
            }
            *counts.entry(name).or_default() += 1;
        }
    }

    let photos: HashMap<&str, &str> = members
        .iter()
        .map(|m| (m.name.as_str(), m.photo.as_str()))
        .collect();

    let mut entries: Vec<LeaderboardEntry> = counts
        .into_iter()
        .map(|(name, count)| LeaderboardEntry {
            name: name.to_string(),
            count,
            photo: photos.get(name).map(|p| p.to_string()),
        })
        .collect();
    entries.sort_by(|a, b| {
        (Reverse(a.count), &a.name).cmp(&(Reverse(b.count), &b.name))
    });
    entries
}
