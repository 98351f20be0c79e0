pub mod detected_face;
pub mod embedding_provider;
pub mod identity_matcher;
pub mod recognition_error;
