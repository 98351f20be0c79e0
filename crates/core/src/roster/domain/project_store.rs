use crate::roster::domain::project::{Project, ProjectSummary};
use crate::roster::domain::session::Session;
use crate::roster::domain::store_error::StoreError;

/// Domain interface for project persistence.
///
/// `append_session` must be an atomic, order-independent merge into the
/// project's session log: concurrent captures against one project never
/// lose a write, and re-appending an identical session is a no-op.
pub trait ProjectStore: Send + Sync {
    fn create_project(&self, project: Project) -> Result<(), StoreError>;

    fn get_project(&self, name: &str) -> Result<Project, StoreError>;

    /// Summaries of every project, sorted by name.
    fn list_projects(&self) -> Result<Vec<ProjectSummary>, StoreError>;

    fn append_session(&self, project: &str, session: Session) -> Result<(), StoreError>;

    fn update_details(&self, project: &str, details: &str) -> Result<(), StoreError>;
}
