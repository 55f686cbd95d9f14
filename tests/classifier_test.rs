// tests/classifier_test.rs
//
// Classifier tensor shape and end-to-end prediction with a stand-in model.

mod test_utils;

use ndarray::ArrayView4;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use emocheckr::classifier::{TensorGeometry, TENSOR_CHANNELS, TENSOR_FRAMES, TENSOR_ROWS};
use emocheckr::config::{ClassifierParams, ConfigBuilder};
use emocheckr::{
    build_tensor, EmotionAnalyzer, EmotionModel, EmotionPredictor, LabelEncoder, ModelLoadError,
    PredictionError,
};
use test_utils::{harmonic_tone, sine, wav_bytes, TestDataset};

/// Scores every class by its index, checking the input shape on the way
struct ShapeCheckingModel {
    classes: usize,
    calls: Arc<AtomicUsize>,
}

impl EmotionModel for ShapeCheckingModel {
    fn predict(&self, input: ArrayView4<'_, f32>) -> Result<Vec<f32>, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if input.dim() != (1, TENSOR_ROWS, TENSOR_FRAMES, TENSOR_CHANNELS) {
            return Err(PredictionError::Inference(format!("bad shape {:?}", input.dim())));
        }
        let total: f32 = (1..=self.classes).map(|i| i as f32).sum();
        Ok((1..=self.classes).map(|i| i as f32 / total).collect())
    }
}

fn encoder() -> LabelEncoder {
    LabelEncoder::new(
        ["angry", "calm", "happy", "sad"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
    .unwrap()
}

#[test]
fn test_tensor_shape_for_any_duration() {
    let geometry = TensorGeometry::default();
    for secs in [0.0f32, 0.01, 0.5, 2.5, 6.0] {
        let samples = harmonic_tone(220.0, 22050, secs);
        let tensor = build_tensor(&samples, 22050, geometry);
        assert_eq!(tensor.dim(), (40, 216, 5), "{} s", secs);
        assert!(tensor.iter().all(|v| v.is_finite()));
    }
}

fn chroma_column(samples: &[f32], frame: usize) -> Vec<f32> {
    let tensor = build_tensor(samples, 22050, TensorGeometry::default());
    (0..TENSOR_ROWS).map(|r| tensor[[r, frame, 4]]).collect()
}

fn peak_row(column: &[f32]) -> usize {
    (0..column.len())
        .max_by(|&a, &b| column[a].total_cmp(&column[b]))
        .unwrap()
}

#[test]
fn test_chroma_is_tuning_corrected() {
    let in_tune = chroma_column(&sine(440.0, 22050, 1.0, 0.5), 20);
    let sharp = chroma_column(&sine(440.0 * 2f32.powf(15.0 / 1200.0), 22050, 1.0, 0.5), 20);

    assert_eq!(peak_row(&in_tune), peak_row(&sharp));
    let drift = in_tune.iter().zip(&sharp).map(|(a, b)| (a - b).abs()).fold(0.0f32, f32::max);
    assert!(drift < 0.15, "chroma drift {}", drift);
}

#[test]
fn test_predict_file_with_stub_model() {
    let ds = TestDataset::new();
    let path = ds.add_bytes(None, "clip.wav", &wav_bytes(&harmonic_tone(180.0, 16000, 1.0), 1, 16000, 16));

    let calls = Arc::new(AtomicUsize::new(0));
    let model = ShapeCheckingModel {
        classes: 4,
        calls: Arc::clone(&calls),
    };
    let predictor = EmotionPredictor::new(Box::new(model), encoder(), &ClassifierParams::default());
    let analyzer = EmotionAnalyzer::builder().predictor(predictor).build();

    let result = analyzer.predict_emotion(&path).unwrap();
    assert_eq!(result.label, "sad");
    assert_eq!(result.class_labels.len(), 4);
    assert!((result.probabilities.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    assert_eq!(result.ranked()[0].0, "sad");

    analyzer.predict_emotion(&path).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_undecodable_file_is_per_call_error() {
    let ds = TestDataset::new();
    let bad = ds.add_bytes(None, "bad.wav", b"nope");
    let good = ds.add_bytes(None, "good.wav", &wav_bytes(&harmonic_tone(180.0, 22050, 0.3), 1, 22050, 16));

    let model = ShapeCheckingModel {
        classes: 4,
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let predictor = EmotionPredictor::new(Box::new(model), encoder(), &ClassifierParams::default());
    let analyzer = EmotionAnalyzer::builder().predictor(predictor).build();

    assert!(matches!(analyzer.predict_emotion(&bad), Err(PredictionError::Decode(_))));
    assert!(analyzer.predict_emotion(&good).is_ok());
}

#[test]
fn test_class_count_mismatch_is_reported() {
    let ds = TestDataset::new();
    let path = ds.add_bytes(None, "clip.wav", &wav_bytes(&harmonic_tone(180.0, 22050, 0.3), 1, 22050, 16));

    let model = ShapeCheckingModel {
        classes: 3,
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let predictor = EmotionPredictor::new(Box::new(model), encoder(), &ClassifierParams::default());
    let err = predictor.predict(&path).unwrap_err();
    assert!(matches!(err, PredictionError::ClassCountMismatch { expected: 4, got: 3 }));
}

#[test]
fn test_missing_model_is_fatal_and_memoised() {
    let ds = TestDataset::new();
    let config = ConfigBuilder::new()
        .model_path(ds.root().join("absent.onnx"))
        .encoder_path(ds.root().join("absent.json"))
        .build()
        .unwrap();
    let analyzer = EmotionAnalyzer::with_config(config);

    assert!(matches!(analyzer.load_predictor(), Err(ModelLoadError::ModelMissing(_))));
    let path = ds.add_bytes(None, "clip.wav", &wav_bytes(&harmonic_tone(180.0, 22050, 0.1), 1, 22050, 16));
    assert!(matches!(
        analyzer.predict_emotion(&path),
        Err(PredictionError::Model(ModelLoadError::ModelMissing(_)))
    ));
}
