use crate::recognition::domain::detected_face::DetectedFace;
use crate::recognition::domain::recognition_error::RecognitionError;

/// Domain interface for the vision model that finds and embeds faces.
///
/// Faces are returned in a deterministic order; the matcher assigns
/// identities in exactly that order.
pub trait EmbeddingProvider: Send + Sync {
    /// Zero or more faces from a group photo.
    fn extract_faces_group(&self, photo: &[u8]) -> Result<Vec<DetectedFace>, RecognitionError>;

    /// Exactly one face from an enrollment photo.
    fn extract_faces(&self, photo: &[u8]) -> Result<DetectedFace, RecognitionError> {
        let mut faces = self.extract_faces_group(photo)?;
        match faces.len() {
            0 => Err(RecognitionError::NoFaceDetected),
            1 => Ok(faces.remove(0)),
            n => Err(RecognitionError::MultipleFacesDetected(n)),
        }
    }
}
