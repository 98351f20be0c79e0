use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::roster::domain::project::{Project, ProjectSummary};
use crate::roster::domain::project_store::ProjectStore;
use crate::roster::domain::session::Session;
use crate::roster::domain::store_error::StoreError;

/// Process-local [`ProjectStore`]. Every operation runs under one lock.
#[derive(Default)]
pub struct InMemoryProjectStore {
    projects: Mutex<BTreeMap<String, Project>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Project>>, StoreError> {
        self.projects.lock().map_err(|_| StoreError::Poisoned)
    }

    fn with_project<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Project) -> T,
    ) -> Result<T, StoreError> {
        let mut projects = self.lock()?;
        let project = projects
            .get_mut(name)
            .ok_or_else(|| StoreError::ProjectNotFound(name.to_string()))?;
        Ok(f(project))
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn create_project(&self, project: Project) -> Result<(), StoreError> {
        let mut projects = self.lock()?;
        if projects.contains_key(&project.name) {
            return Err(StoreError::ProjectAlreadyExists(project.name));
        }
        projects.insert(project.name.clone(), project);
        Ok(())
    }

    fn get_project(&self, name: &str) -> Result<Project, StoreError> {
        self.with_project(name, |p| p.clone())
    }

    fn list_projects(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        Ok(self.lock()?.values().map(Project::summary).collect())
    }

    fn append_session(&self, project: &str, session: Session) -> Result<(), StoreError> {
        self.with_project(project, |p| {
            p.merge_session(session);
        })
    }

    fn update_details(&self, project: &str, details: &str) -> Result<(), StoreError> {
        self.with_project(project, |p| p.details = Some(details.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::domain::member::Member;
    use crate::shared::embedding::Embedding;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;
    use std::thread;

    fn ts(offset_ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::milliseconds(offset_ms)
    }

    fn project(name: &str) -> Project {
        let members = vec![Member::new("alice", "a.jpg", Embedding::new(vec![1.0]))];
        Project::new(name, members, ts(0)).unwrap()
    }

    #[test]
    fn test_create_then_get() {
        let store = InMemoryProjectStore::new();
        store.create_project(project("p")).unwrap();
        assert_eq!(store.get_project("p").unwrap(), project("p"));
    }

    #[test]
    fn test_create_twice_is_rejected() {
        let store = InMemoryProjectStore::new();
        store.create_project(project("p")).unwrap();
        let err = store.create_project(project("p")).unwrap_err();
        assert!(matches!(err, StoreError::ProjectAlreadyExists(name) if name == "p"));
    }

    #[test]
    fn test_missing_project_is_not_found() {
        let store = InMemoryProjectStore::new();
        assert!(matches!(
            store.get_project("nope"),
            Err(StoreError::ProjectNotFound(_))
        ));
        assert!(matches!(
            store.append_session("nope", Session::new(vec![], "x", "", ts(1))),
            Err(StoreError::ProjectNotFound(_))
        ));
        assert!(matches!(
            store.update_details("nope", "d"),
            Err(StoreError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn test_list_projects_sorted_by_name() {
        let store = InMemoryProjectStore::new();
        store.create_project(project("zeta")).unwrap();
        store.create_project(project("alpha")).unwrap();
        let names: Vec<String> = store
            .list_projects()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_update_details() {
        let store = InMemoryProjectStore::new();
        store.create_project(project("p")).unwrap();
        store.update_details("p", "weekly sync").unwrap();
        assert_eq!(
            store.get_project("p").unwrap().details.as_deref(),
            Some("weekly sync")
        );
    }

    #[test]
    fn test_append_same_session_twice_keeps_one() {
        let store = InMemoryProjectStore::new();
        store.create_project(project("p")).unwrap();
        let session = Session::new(vec!["alice".into()], "x.jpg", "c", ts(1));
        store.append_session("p", session.clone()).unwrap();
        store.append_session("p", session).unwrap();
        assert_eq!(store.get_project("p").unwrap().sessions.len(), 1);
    }

    #[test]
    fn test_concurrent_appends_are_all_kept() {
        let store = Arc::new(InMemoryProjectStore::new());
        store.create_project(project("p")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..25 {
                        let session =
                            Session::new(vec!["alice".into()], "x.jpg", "", ts(t * 100 + i + 1));
                        store.append_session("p", session).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get_project("p").unwrap().sessions.len(), 200);
    }
}
