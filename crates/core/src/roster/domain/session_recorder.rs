use chrono::{DateTime, Utc};

use crate::roster::domain::project_store::ProjectStore;
use crate::roster::domain::session::Session;
use crate::roster::domain::store_error::StoreError;

/// Builds a session record and merges it into the project's log.
///
/// Errors from the store propagate unchanged.
pub fn record_session(
    store: &dyn ProjectStore,
    project: &str,
    participants: Vec<String>,
    photo: impl Into<String>,
    caption: impl Into<String>,
    timestamp: DateTime<Utc>,
) -> Result<Session, StoreError> {
    let session = Session::new(participants, photo, caption, timestamp);
    store.append_session(project, session.clone())?;
    log::info!(
        "Recorded session in {project} with {} participant(s)",
        session.participants.len()
    );
    Ok(session)
}
