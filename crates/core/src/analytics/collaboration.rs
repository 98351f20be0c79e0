use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::roster::domain::session::Session;

/// Unordered pair of two distinct names, stored in lexical order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NamePair {
    first: String,
    second: String,
}

impl NamePair {
    /// Returns `None` when both names are the same.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Option<Self> {
        let (a, b) = (a.into(), b.into());
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { first: a, second: b }),
            std::cmp::Ordering::Greater => Some(Self { first: b, second: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

/// Pair → fraction of all recorded sessions in which both names appear.
pub type CollaborationScores = BTreeMap<NamePair, f64>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollaborationPair {
    pub pair: NamePair,
    pub score: f64,
}

/// Co-occurrence count of every distinct pair, normalized by the total
/// number of sessions (not by the sessions containing the pair).
///
/// Sessions with fewer than two participants add no pairs but still count
/// toward the denominator. An empty history yields an empty map.
pub fn collaboration_scores(sessions: &[Session]) -> CollaborationScores {
    if sessions.is_empty() {
        return CollaborationScores::new();
    }

    let mut pair_counts: BTreeMap<NamePair, usize> = BTreeMap::new();
    for session in sessions {
        let names: Vec<&str> = session.participant_set().into_iter().collect();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                if let Some(pair) = NamePair::new(*a, *b) {
                    *pair_counts.entry(pair).or_default() += 1;
                }
            }
        }
    }

    let total = sessions.len() as f64;
    pair_counts
        .into_iter()
        .map(|(pair, count)| (pair, count as f64 / total))
        .collect()
}

/// Pairs ranked by score descending, ties by pair order.
pub fn collaboration_pairs(sessions: &[Session]) -> Vec<CollaborationPair> {
    let mut pairs: Vec<CollaborationPair> = collaboration_scores(sessions)
        .into_iter()
        .map(|(pair, score)| CollaborationPair { pair, score })
        .collect();
    // Stable sort keeps the map's pair order among equal scores.
    pairs.sort_by(|a, b| b.score.total_cmp(&a.score));
    pairs
}
