use std::sync::Arc;

use crate::analytics::collaboration::{
    collaboration_pairs, collaboration_scores, CollaborationPair, CollaborationScores,
};
use crate::analytics::leaderboard::{leaderboard, LeaderboardEntry};
use crate::analytics::social_graph::{social_graph, SocialGraph};
use crate::roster::domain::project_store::ProjectStore;
use crate::roster::domain::store_error::StoreError;

/// Read-only analytics over a stored project's session log.
///
/// Leaderboard and scores surface store failures. The social graph never
/// fails: any problem, including a missing project, yields an empty graph.
pub struct ProjectAnalytics {
    store: Arc<dyn ProjectStore>,
}

impl ProjectAnalytics {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    pub fn leaderboard(&self, project_name: &str) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let project = self.store.get_project(project_name)?;
        Ok(leaderboard(&project.sessions, &project.members))
    }

    pub fn collaboration_scores(
        &self,
        project_name: &str,
    ) -> Result<CollaborationScores, StoreError> {
        let project = self.store.get_project(project_name)?;
        Ok(collaboration_scores(&project.sessions))
    }

    pub fn collaboration_pairs(
        &self,
        project_name: &str,
    ) -> Result<Vec<CollaborationPair>, StoreError> {
        let project = self.store.get_project(project_name)?;
        Ok(collaboration_pairs(&project.sessions))
    }

    pub fn social_graph(&self, project_name: &str) -> SocialGraph {
        match self.store.get_project(project_name) {
            Ok(project) => social_graph(&project.sessions),
            Err(e) => {
                log::warn!("Social graph unavailable for {project_name}: {e}");
                SocialGraph::default()
            }
        }
    }
}
