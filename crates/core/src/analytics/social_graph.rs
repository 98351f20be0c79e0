use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::collaboration::collaboration_scores;
use crate::roster::domain::session::Session;

#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("session {index} has a blank participant name")]
    BlankParticipant { index: usize },
    #[error("score {score} for {source_name}-{target_name} is outside [0, 1]")]
    InvalidScore {
        source_name: String,
        target_name: String,
        score: f64,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

/// Node/link view of historical co-occurrence, shaped for force-directed
/// graph renderers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl SocialGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

/// Builds the graph, degrading to an empty graph on any failure.
pub fn social_graph(sessions: &[Session]) -> SocialGraph {
    try_social_graph(sessions).unwrap_or_else(|e| {
        log::warn!("Social graph unavailable, returning empty graph: {e}");
        SocialGraph::default()
    })
}

/// Every name that ever took part becomes a node, members or not; every
/// pair with a nonzero collaboration score becomes a link.
///
/// Nodes are sorted by name and links by pair, so output is stable.
pub fn try_social_graph(sessions: &[Session]) -> Result<SocialGraph, GraphError> {
    let mut names: BTreeSet<&str> = BTreeSet::new();
    for (index, session) in sessions.iter().enumerate() {
        for name in session.participant_set() {
            if name.trim().is_empty() {
                return Err(GraphError::BlankParticipant { index });
            }
            names.insert(name);
        }
    }

    let mut links = Vec::new();
    for (pair, score) in collaboration_scores(sessions) {
        if !(0.0..=1.0).contains(&score) {
            return Err(GraphError::InvalidScore {
                source_name: pair.first().to_string(),
                target_name: pair.second().to_string(),
                score,
            });
        }
        if score > 0.0 {
            links.push(GraphLink {
                source: pair.first().to_string(),
                target: pair.second().to_string(),
                value: score,
            });
        }
    }

    Ok(SocialGraph {
        nodes: names
            .into_iter()
            .map(|id| GraphNode { id: id.to_string() })
            .collect(),
        links,
    })
}
