// src/classifier/onnx.rs
//
// ONNX Runtime backend for `EmotionModel`

use ndarray::ArrayView4;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

use super::model::EmotionModel;
use crate::error::{ModelLoadError, PredictionError};

/// ONNX model session. Runs are serialised through a mutex.
pub struct OnnxModel {
    session: Mutex<Session>,
}

impl OnnxModel {
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let malformed = |reason: String| ModelLoadError::ModelMalformed {
            path: path.to_path_buf(),
            reason,
        };
        let session = Session::builder()
            .map_err(|e| malformed(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| malformed(e.to_string()))?;
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl EmotionModel for OnnxModel {
    fn predict(&self, input: ArrayView4<'_, f32>) -> Result<Vec<f32>, PredictionError> {
        let (batch, rows, frames, channels) = input.dim();
        let shape = [batch, rows, frames, channels];
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_array((shape, data)).map_err(|e| PredictionError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| PredictionError::Inference("model session lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| PredictionError::Inference(e.to_string()))?;

        let (_, scores) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| PredictionError::Inference(e.to_string()))?;
        Ok(scores.to_vec())
    }
}
