use thiserror::Error;

use crate::shared::embedding::EmbeddingError;

/// Failures while turning a photo into identities.
#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("no face detected in enrollment photo")]
    NoFaceDetected,
    #[error("enrollment photo must contain exactly one face, found {0}")]
    MultipleFacesDetected(usize),
    #[error("face extraction failed: {0}")]
    ProviderFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error(transparent)]
    DimensionMismatch(#[from] EmbeddingError),
}

impl RecognitionError {
    pub fn provider<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        RecognitionError::ProviderFailure(err.into())
    }
}
