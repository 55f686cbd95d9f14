//! Emotion classification
//!
//! Builds the fixed-shape `(40, 216, 5)` input tensor, runs it through a
//! pretrained model and maps the highest score back to a label. The model
//! itself is opaque behind [`EmotionModel`]; the ONNX backend is available
//! with the `onnx` feature.

mod encoder;
mod model;
#[cfg(feature = "onnx")]
mod onnx;
mod tensor;

pub use encoder::LabelEncoder;
pub use model::{EmotionModel, EmotionPredictor, PredictionResult, SharedPredictor};
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;
pub use tensor::{batch_of_one, build_tensor, TensorGeometry, TENSOR_CHANNELS, TENSOR_FRAMES, TENSOR_ROWS};
