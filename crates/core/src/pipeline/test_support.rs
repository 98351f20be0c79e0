//! Stubs shared by the use-case tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::recognition::domain::detected_face::DetectedFace;
use crate::recognition::domain::embedding_provider::EmbeddingProvider;
use crate::recognition::domain::recognition_error::RecognitionError;
use crate::roster::domain::clock::Clock;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::embedding::Embedding;

/// Returns canned faces keyed by the exact photo bytes; unknown photos fail.
pub struct StubProvider {
    faces: HashMap<Vec<u8>, Vec<Vec<f32>>>,
    calls: Arc<AtomicUsize>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            faces: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_faces(mut self, photo: &[u8], embeddings: Vec<Vec<f32>>) -> Self {
        self.faces.insert(photo.to_vec(), embeddings);
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl EmbeddingProvider for StubProvider {
    fn extract_faces_group(&self, photo: &[u8]) -> Result<Vec<DetectedFace>, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let embeddings = self
            .faces
            .get(photo)
            .ok_or_else(|| RecognitionError::provider("unreadable photo"))?;
        Ok(embeddings
            .iter()
            .enumerate()
            .map(|(i, e)| {
                DetectedFace::new(
                    BoundingBox::new(i as i32 * 50, 0, 40, 40),
                    Embedding::new(e.clone()),
                )
            })
            .collect())
    }
}

/// Deterministic clock: one minute per call from a fixed start.
pub struct FixedClock {
    ticks: Mutex<i64>,
}

impl FixedClock {
    pub fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self {
            ticks: Mutex::new(0),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let mut ticks = self.ticks.lock().unwrap();
        let now = Self::start() + Duration::minutes(*ticks);
        *ticks += 1;
        now
    }
}
