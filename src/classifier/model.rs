// src/classifier/model.rs
//
// Model abstraction, single-file prediction and the lazily loaded shared
// predictor.

use ndarray::ArrayView4;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use super::encoder::LabelEncoder;
use super::tensor::{batch_of_one, build_tensor, TensorGeometry};
use crate::config::ClassifierParams;
use crate::core::decoder::load_mono;
use crate::error::{ModelLoadError, PredictionError};

/// A pretrained classifier: `(1, 40, 216, 5)` tensor in, one score per class out
pub trait EmotionModel: Send + Sync {
    fn predict(&self, input: ArrayView4<'_, f32>) -> Result<Vec<f32>, PredictionError>;
}

/// Predicted label with the full distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: String,
    pub probabilities: Vec<f32>,
    pub class_labels: Vec<String>,
}

impl PredictionResult {
    /// `(label, probability)` pairs, most likely first
    pub fn ranked(&self) -> Vec<(&str, f32)> {
        let mut pairs: Vec<(&str, f32)> = self
            .class_labels
            .iter()
            .map(String::as_str)
            .zip(self.probabilities.iter().copied())
            .collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        pairs
    }

    pub fn confidence(&self) -> f32 {
        self.probabilities.iter().copied().fold(0.0, f32::max)
    }
}

/// Index of the first maximum
fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// A loaded model paired with its label encoder
pub struct EmotionPredictor {
    model: Box<dyn EmotionModel>,
    encoder: LabelEncoder,
    sample_rate: u32,
    geometry: TensorGeometry,
}

impl EmotionPredictor {
    pub fn new(model: Box<dyn EmotionModel>, encoder: LabelEncoder, params: &ClassifierParams) -> Self {
        Self {
            model,
            encoder,
            sample_rate: params.sample_rate,
            geometry: TensorGeometry {
                n_fft: params.n_fft,
                hop_length: params.hop_length,
            },
        }
    }

    /// Load the encoder and model artefacts named in `params`
    pub fn load(params: &ClassifierParams) -> Result<Self, ModelLoadError> {
        if !params.model_path.is_file() {
            return Err(ModelLoadError::ModelMissing(params.model_path.clone()));
        }
        let encoder = LabelEncoder::from_file(&params.encoder_path)?;
        let model = load_backend(&params.model_path)?;
        log::info!(
            "Loaded classifier {} ({} classes)",
            params.model_path.display(),
            encoder.len()
        );
        Ok(Self::new(model, encoder, params))
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    /// Classify a mono signal already at the classifier's sample rate
    pub fn predict_signal(&self, samples: &[f32], sample_rate: u32) -> Result<PredictionResult, PredictionError> {
        let input = batch_of_one(build_tensor(samples, sample_rate, self.geometry));
        let scores = self.model.predict(input.view())?;

        if scores.is_empty() {
            return Err(PredictionError::EmptyOutput);
        }
        if scores.len() != self.encoder.len() {
            return Err(PredictionError::ClassCountMismatch {
                expected: self.encoder.len(),
                got: scores.len(),
            });
        }

        let label = argmax(&scores)
            .and_then(|i| self.encoder.inverse_transform(i))
            .ok_or(PredictionError::EmptyOutput)?
            .to_string();

        Ok(PredictionResult {
            label,
            probabilities: scores,
            class_labels: self.encoder.classes().to_vec(),
        })
    }

    /// Decode `path` at the classifier rate, mix to mono and classify
    pub fn predict(&self, path: &Path) -> Result<PredictionResult, PredictionError> {
        let audio = load_mono(path, Some(self.sample_rate))?;
        let result = self.predict_signal(&audio.samples, audio.sample_rate)?;
        log::debug!("{} -> {} ({:.2})", path.display(), result.label, result.confidence());
        Ok(result)
    }
}

#[cfg(feature = "onnx")]
fn load_backend(path: &Path) -> Result<Box<dyn EmotionModel>, ModelLoadError> {
    Ok(Box::new(super::onnx::OnnxModel::load(path)?))
}

#[cfg(not(feature = "onnx"))]
fn load_backend(_path: &Path) -> Result<Box<dyn EmotionModel>, ModelLoadError> {
    Err(ModelLoadError::BackendUnavailable)
}

/// Predictor loaded at most once, on first use. A failed load is kept and
/// returned to every later caller.
pub struct SharedPredictor {
    params: ClassifierParams,
    cell: OnceLock<Result<Arc<EmotionPredictor>, ModelLoadError>>,
}

impl SharedPredictor {
    pub fn new(params: ClassifierParams) -> Self {
        Self {
            params,
            cell: OnceLock::new(),
        }
    }

    /// Already-initialised handle around an injected predictor
    pub fn with_predictor(predictor: EmotionPredictor, params: ClassifierParams) -> Self {
        Self {
            params,
            cell: OnceLock::from(Ok(Arc::new(predictor))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.cell.get(), Some(Ok(_)))
    }

    pub fn get(&self) -> Result<Arc<EmotionPredictor>, ModelLoadError> {
        self.cell
            .get_or_init(|| EmotionPredictor::load(&self.params).map(Arc::new))
            .clone()
    }

    pub fn predict(&self, path: &Path) -> Result<PredictionResult, PredictionError> {
        self.get()?.predict(path)
    }
}
