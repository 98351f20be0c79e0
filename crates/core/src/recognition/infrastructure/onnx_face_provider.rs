use crate::recognition::domain::detected_face::DetectedFace;
use crate::recognition::domain::embedding_provider::EmbeddingProvider;
use crate::recognition::domain::recognition_error::RecognitionError;
use crate::shared::photo::RgbPhoto;

use super::arcface_embedder::ArcFaceEmbedder;
use super::model_resolver::ResolvedModels;
use super::yolo_face_detector::YoloFaceDetector;

/// [`EmbeddingProvider`] backed by a YOLO face detector and an ArcFace
/// recognizer.
///
/// Photo bytes are decoded with the `image` crate; every decode or
/// inference error surfaces as [`RecognitionError::ProviderFailure`].
pub struct OnnxFaceProvider {
    detector: YoloFaceDetector,
    embedder: ArcFaceEmbedder,
}

impl OnnxFaceProvider {
    pub fn new(models: &ResolvedModels, confidence: f64) -> Result<Self, RecognitionError> {
        let detector =
            YoloFaceDetector::new(&models.detector, confidence).map_err(RecognitionError::provider)?;
        let embedder = ArcFaceEmbedder::new(&models.embedder).map_err(RecognitionError::provider)?;
        Ok(Self { detector, embedder })
    }
}

impl EmbeddingProvider for OnnxFaceProvider {
    fn extract_faces_group(&self, photo: &[u8]) -> Result<Vec<DetectedFace>, RecognitionError> {
        let decoded = RgbPhoto::decode(photo).map_err(RecognitionError::provider)?;
        let boxes = self
            .detector
            .detect(&decoded)
            .map_err(RecognitionError::provider)?;
        log::debug!(
            "Detected {} face(s) in {}x{} photo",
            boxes.len(),
            decoded.width(),
            decoded.height()
        );

        boxes
            .into_iter()
            .map(|scored| {
                let crop = decoded.crop(&scored.bbox);
                let embedding = self
                    .embedder
                    .embed(&crop)
                    .map_err(RecognitionError::provider)?;
                Ok(DetectedFace::new(scored.bbox, embedding))
            })
            .collect()
    }
}
