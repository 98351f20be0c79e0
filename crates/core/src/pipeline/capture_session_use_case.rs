use std::sync::Arc;

use thiserror::Error;

use crate::recognition::domain::embedding_provider::EmbeddingProvider;
use crate::recognition::domain::identity_matcher::IdentityMatcher;
use crate::recognition::domain::recognition_error::RecognitionError;
use crate::roster::domain::clock::Clock;
use crate::roster::domain::project_store::ProjectStore;
use crate::roster::domain::session::Session;
use crate::roster::domain::session_recorder::record_session;
use crate::roster::domain::store_error::StoreError;

#[derive(Error, Debug)]
pub enum CaptureSessionError {
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Group-photo capture: load roster → extract faces → match → record.
pub struct CaptureSessionUseCase {
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn ProjectStore>,
    clock: Arc<dyn Clock>,
    matcher: IdentityMatcher,
}

impl CaptureSessionUseCase {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn ProjectStore>,
        clock: Arc<dyn Clock>,
        matcher: IdentityMatcher,
    ) -> Self {
        Self {
            provider,
            store,
            clock,
            matcher,
        }
    }

    /// Records one session and returns it. Nothing is written on failure.
    pub fn execute(
        &self,
        project_name: &str,
        photo_ref: &str,
        photo: &[u8],
        caption: &str,
    ) -> Result<Session, CaptureSessionError> {
        let project = self.store.get_project(project_name)?;

        let faces = self.provider.extract_faces_group(photo)?;
        let participants = self.matcher.match_faces(&project.members, &faces)?;
        log::info!(
            "Matched {}/{} face(s) in {photo_ref} against {} member(s) (threshold {})",
            participants.len(),
            faces.len(),
            project.members.len(),
            self.matcher.threshold()
        );

        let session = record_session(
            self.store.as_ref(),
            project_name,
            participants,
            photo_ref,
            caption,
            self.clock.now(),
        )?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::{FixedClock, StubProvider};
    use crate::roster::domain::member::Member;
    use crate::roster::domain::project::Project;
    use crate::roster::infrastructure::in_memory_store::InMemoryProjectStore;
    use crate::shared::embedding::Embedding;

    fn store() -> Arc<InMemoryProjectStore> {
        let store = Arc::new(InMemoryProjectStore::new());
        let members = vec![
            Member::new("alice", "a.jpg", Embedding::new(vec![1.0, 0.0, 0.0])),
            Member::new("bob", "b.jpg", Embedding::new(vec![0.0, 1.0, 0.0])),
            Member::new("carol", "c.jpg", Embedding::new(vec![0.0, 0.0, 1.0])),
        ];
        store
            .create_project(Project::new("team", members, FixedClock::start()).unwrap())
            .unwrap();
        store
    }

    fn use_case(provider: StubProvider, store: Arc<InMemoryProjectStore>) -> CaptureSessionUseCase {
        CaptureSessionUseCase::new(
            Arc::new(provider),
            store,
            Arc::new(FixedClock::default()),
            IdentityMatcher::default(),
        )
    }

    #[test]
    fn test_records_matched_participants_in_face_order() {
        let provider = StubProvider::new().with_faces(
            b"group",
            vec![vec![0.0, 0.1, 0.95], vec![0.9, 0.2, 0.0], vec![0.5, 0.5, 0.5]],
        );
        let store = store();
        let use_case = use_case(provider, store.clone());

        let session = use_case.execute("team", "g.jpg", b"group", "retro").unwrap();

        assert_eq!(session.participants, vec!["carol", "alice"]);
        assert_eq!(session.photo, "g.jpg");
        assert_eq!(session.caption, "retro");
        assert_eq!(store.get_project("team").unwrap().sessions, vec![session]);
    }

    #[test]
    fn test_photo_without_faces_records_empty_session() {
        let provider = StubProvider::new().with_faces(b"empty", vec![]);
        let store = store();
        let use_case = use_case(provider, store.clone());

        let session = use_case.execute("team", "e.jpg", b"empty", "").unwrap();
        assert!(session.participants.is_empty());
        assert_eq!(store.get_project("team").unwrap().sessions.len(), 1);
    }

    #[test]
    fn test_successive_captures_get_increasing_timestamps() {
        let provider = StubProvider::new().with_faces(b"group", vec![vec![1.0, 0.0, 0.0]]);
        let store = store();
        let use_case = use_case(provider, store.clone());

        let first = use_case.execute("team", "1.jpg", b"group", "").unwrap();
        let second = use_case.execute("team", "1.jpg", b"group", "").unwrap();
        assert!(second.timestamp > first.timestamp);
        assert_eq!(store.get_project("team").unwrap().sessions.len(), 2);
    }

    #[test]
    fn test_unknown_project_fails_before_extraction() {
        let provider = StubProvider::new().with_faces(b"group", vec![vec![1.0, 0.0, 0.0]]);
        let calls = provider.calls();
        let use_case = use_case(provider, store());

        let err = use_case.execute("ghost", "g.jpg", b"group", "").unwrap_err();
        assert!(matches!(
            err,
            CaptureSessionError::Store(StoreError::ProjectNotFound(_))
        ));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn test_provider_failure_records_nothing() {
        let store = store();
        let use_case = use_case(StubProvider::new(), store.clone());

        let err = use_case.execute("team", "g.jpg", b"corrupt", "").unwrap_err();
        assert!(matches!(
            err,
            CaptureSessionError::Recognition(RecognitionError::ProviderFailure(_))
        ));
        assert!(store.get_project("team").unwrap().sessions.is_empty());
    }

    #[test]
    fn test_embedding_dimension_mismatch_records_nothing() {
        let provider = StubProvider::new().with_faces(b"group", vec![vec![1.0, 0.0]]);
        let store = store();
        let use_case = use_case(provider, store.clone());

        let err = use_case.execute("team", "g.jpg", b"group", "").unwrap_err();
        assert!(matches!(
            err,
            CaptureSessionError::Recognition(RecognitionError::DimensionMismatch(_))
        ));
        assert!(store.get_project("team").unwrap().sessions.is_empty());
    }
}
