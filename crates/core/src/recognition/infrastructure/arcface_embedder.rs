/// ArcFace face embedder using ONNX Runtime.
///
/// Produces L2-normalized identity vectors from face crops, so cosine
/// similarity between two outputs reduces to a dot product.
use std::path::Path;
use std::sync::Mutex;

use crate::shared::embedding::Embedding;
use crate::shared::photo::RgbPhoto;

use super::execution_provider::build_session;
use super::math::l2_normalize;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const INPUT_SIZE: usize = 112;
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

pub struct ArcFaceEmbedder {
    session: Mutex<ort::session::Session>,
}

impl ArcFaceEmbedder {
    pub fn new(model_path: &Path) -> Result<Self, BoxError> {
        Ok(Self {
            session: Mutex::new(build_session(model_path)?),
        })
    }

    pub fn embed(&self, crop: &RgbPhoto) -> Result<Embedding, BoxError> {
        if crop.width() == 0 || crop.height() == 0 {
            return Err("Cannot embed an empty face crop".into());
        }

        let tensor = preprocess(crop);
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?;
        let outputs = session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("ArcFace model produced no outputs".into());
        }
        let embedding_array = outputs[0].try_extract_array::<f32>()?;
        let embedding_slice = embedding_array
            .as_slice()
            .ok_or("Cannot get embedding slice")?;

        let mut values = embedding_slice.to_vec();
        l2_normalize(&mut values);
        Ok(Embedding::new(values))
    }
}

/// Resize crop to 112x112, normalize, NCHW layout.
fn preprocess(crop: &RgbPhoto) -> ndarray::Array4<f32> {
    let src_w = crop.width() as usize;
    let src_h = crop.height() as usize;
    let src = crop.as_ndarray();

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, INPUT_SIZE, INPUT_SIZE));

    for y in 0..INPUT_SIZE {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / INPUT_SIZE as f64) as usize).min(src_h - 1);
        for x in 0..INPUT_SIZE {
            let src_x =
                (((x as f64 + 0.5) * src_w as f64 / INPUT_SIZE as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = (src[[src_y, src_x, c]] as f32 - NORM_MEAN) / NORM_STD;
            }
        }
    }

    tensor
}
