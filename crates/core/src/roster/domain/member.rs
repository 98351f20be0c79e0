use serde::{Deserialize, Serialize};

use crate::shared::embedding::Embedding;

/// An enrolled person. The name is the identity key within a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    /// Opaque reference to the enrollment photo (path or URL).
    pub photo: String,
    pub embedding: Embedding,
}

impl Member {
    pub fn new(name: impl Into<String>, photo: impl Into<String>, embedding: Embedding) -> Self {
        Self {
            name: name.into(),
            photo: photo.into(),
            embedding,
        }
    }
}
