use crate::shared::bounding_box::BoundingBox;
use crate::shared::embedding::Embedding;

/// A face found in one photo. Lives only for the duration of one match.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedFace {
    pub bounding_box: BoundingBox,
    pub embedding: Embedding,
}

impl DetectedFace {
    pub fn new(bounding_box: BoundingBox, embedding: Embedding) -> Self {
        Self {
            bounding_box,
            embedding,
        }
    }
}
