use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roster::domain::member::Member;
use crate::roster::domain::session::Session;
use crate::roster::domain::store_error::StoreError;

/// A group of enrolled members and the log of their group photos.
///
/// Members keep enrollment order; sessions keep append order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub members: Vec<Member>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Builds an empty-history project, rejecting blank or repeated names.
    pub fn new(
        name: impl Into<String>,
        members: Vec<Member>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let name = name.into();
        validate_names(&name, members.iter().map(|m| m.name.as_str()))?;
        Ok(Self {
            name,
            members,
            sessions: Vec::new(),
            details: None,
            created_at,
        })
    }

    /// Set-union add: a session already in the log is not added twice.
    ///
    /// Returns whether the log changed.
    pub fn merge_session(&mut self, session: Session) -> bool {
        if self.sessions.contains(&session) {
            return false;
        }
        self.sessions.push(session);
        true
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            name: self.name.clone(),
            member_count: self.members.len(),
            session_count: self.sessions.len(),
            details: self.details.clone(),
            created_at: self.created_at,
        }
    }
}

/// Checks that the project name and every member name are non-blank and
/// that no member name repeats.
pub fn validate_names<'a>(
    project: &str,
    members: impl IntoIterator<Item = &'a str>,
) -> Result<(), StoreError> {
    if project.trim().is_empty() {
        return Err(StoreError::InvalidName(project.to_string()));
    }
    let mut seen = HashSet::new();
    for member in members {
        if member.trim().is_empty() {
            return Err(StoreError::InvalidName(member.to_string()));
        }
        if !seen.insert(member) {
            return Err(StoreError::DuplicateMember {
                project: project.to_string(),
                member: member.to_string(),
            });
        }
    }
    Ok(())
}

/// Lightweight listing entry for a project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    pub member_count: usize,
    pub session_count: usize,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::embedding::Embedding;
    use chrono::TimeZone;

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
    }

    fn member(name: &str) -> Member {
        Member::new(name, format!("{name}.jpg"), Embedding::new(vec![1.0, 0.0]))
    }

    #[test]
    fn test_new_rejects_duplicate_member_names() {
        let err = Project::new("p", vec![member("alice"), member("alice")], ts(0)).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateMember { member, .. } if member == "alice"));
    }

    #[test]
    fn test_new_rejects_blank_names() {
        assert!(matches!(
            Project::new("  ", vec![], ts(0)),
            Err(StoreError::InvalidName(_))
        ));
        assert!(matches!(
            Project::new("p", vec![member("")], ts(0)),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn test_merge_session_is_idempotent() {
        let mut project = Project::new("p", vec![member("alice")], ts(0)).unwrap();
        let session = Session::new(vec!["alice".into()], "a.jpg", "", ts(1));

        assert!(project.merge_session(session.clone()));
        assert!(!project.merge_session(session));
        assert_eq!(project.sessions.len(), 1);
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let json = r#"{"name":"p","members":[],"created_at":"2024-05-01T12:00:00Z"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.sessions.is_empty());
        assert!(project.details.is_none());
    }

    #[test]
    fn test_summary_counts() {
        let mut project = Project::new("p", vec![member("alice")], ts(0)).unwrap();
        project.merge_session(Session::new(vec![], "a.jpg", "", ts(1)));
        let summary = project.summary();
        assert_eq!(summary.member_count, 1);
        assert_eq!(summary.session_count, 1);
    }
}
