use std::sync::Arc;

use thiserror::Error;

use crate::recognition::domain::embedding_provider::EmbeddingProvider;
use crate::recognition::domain::recognition_error::RecognitionError;
use crate::roster::domain::clock::Clock;
use crate::roster::domain::member::Member;
use crate::roster::domain::project::{validate_names, Project};
use crate::roster::domain::project_store::ProjectStore;
use crate::roster::domain::store_error::StoreError;

#[derive(Error, Debug)]
pub enum CreateProjectError {
    #[error("failed to enroll {member}: {source}")]
    Enrollment {
        member: String,
        #[source]
        source: RecognitionError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A member to enroll: display name, photo reference, and the photo itself.
pub struct EnrollmentRequest {
    pub name: String,
    pub photo_ref: String,
    pub photo: Vec<u8>,
}

/// Enrolls every member from a single-face photo and stores the project.
///
/// All-or-nothing: the first member whose photo does not yield exactly one
/// face aborts creation and nothing is written.
pub struct CreateProjectUseCase {
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn ProjectStore>,
    clock: Arc<dyn Clock>,
}

impl CreateProjectUseCase {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn ProjectStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            store,
            clock,
        }
    }

    pub fn execute(
        &self,
        project_name: &str,
        requests: Vec<EnrollmentRequest>,
    ) -> Result<Project, CreateProjectError> {
        // Name problems are cheaper to report before running the model.
        validate_names(project_name, requests.iter().map(|r| r.name.as_str()))?;

        let mut members = Vec::with_capacity(requests.len());
        for request in requests {
            let face = self
                .provider
                .extract_faces(&request.photo)
                .map_err(|source| CreateProjectError::Enrollment {
                    member: request.name.clone(),
                    source,
                })?;
            log::info!(
                "Enrolled {} ({}-dim embedding)",
                request.name,
                face.embedding.dimension()
            );
            members.push(Member::new(request.name, request.photo_ref, face.embedding));
        }

        let project = Project::new(project_name, members, self.clock.now())?;
        self.store.create_project(project.clone())?;
        log::info!(
            "Created project {} with {} member(s)",
            project.name,
            project.members.len()
        );
        Ok(project)
    }
}
