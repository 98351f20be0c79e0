pub mod arcface_embedder;
pub mod execution_provider;
pub mod math;
pub mod model_resolver;
pub mod onnx_face_provider;
pub mod yolo_face_detector;
