pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

/// Minimum cosine similarity (exclusive) for a face to claim a member.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Default face detection confidence.
pub const DEFAULT_DETECTION_CONFIDENCE: f64 = 0.5;

/// Application directory name under the platform config/data/cache dirs.
pub const APP_DIR_NAME: &str = "Buddio";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
