//! EmoCheckr - Speech-emotion dataset tooling
//!
//! Indexes emotion-labelled speech datasets, normalises WAV audio, extracts
//! descriptive acoustic features and runs a pretrained emotion classifier.
//!
//! ## Features
//!
//! - **Filename metadata**: decodes `Modality-Channel-Emotion-Intensity-Statement-Repetition-Actor.wav`
//! - **Dataset indexing**: recursive catalogue with diagnostics for skipped files
//! - **WAV normalisation**: polyphase resampling, downmix, 16-bit requantisation,
//!   with fallback to the original bytes
//! - **Descriptive features**: 35 fixed fields (energy, pitch, spectral shape, MFCC)
//! - **Batch extraction**: sequential, per-file failure isolation, grouped statistics
//! - **Classification**: `(40, 216, 5)` tensor builder and a pluggable model
//!   (ONNX backend behind the `onnx` feature)
//!
//! ## Module Structure
//!
//! - `core` - DSP primitives, decoding, WAV normalisation, feature analysis
//! - `dataset` - Filename parser and directory catalogue
//! - `pipeline` - Batch extraction and grouped statistics
//! - `classifier` - Tensor builder, label encoder, predictor
//! - `config` - Serialisable configuration
//! - `cli` - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use emocheckr::EmotionAnalyzer;
//! use std::path::Path;
//!
//! let analyzer = EmotionAnalyzer::new();
//! let catalogue = analyzer.load_catalogue(Path::new("data/ravdess"));
//! let table = analyzer.extract_batch_features(&catalogue, Some(50), |p| {
//!     eprintln!("{}/{} {}", p.completed, p.total, p.filename);
//! });
//! println!("{} rows, {} skipped", table.len(), table.failed.len());
//! ```

// Shared memo cache
pub mod cache;

// Signal processing and analysis
pub mod core;

// Dataset metadata and indexing
pub mod dataset;

// Batch feature pipeline
pub mod pipeline;

// Emotion classifier
pub mod classifier;

// Configuration
pub mod config;

// Error types
pub mod error;

// Command-line interface
pub mod cli;

pub use crate::core::{
    decode_file, extract, extract_file, normalize_audio, read_audio_properties, AcousticFeatures,
    AnalyzerBuilder, AudioProperties, ConversionStatus, DecodedAudio, EmotionAnalyzer,
    NormalizedAudio, FEATURE_NAMES,
};
pub use classifier::{build_tensor, EmotionModel, EmotionPredictor, LabelEncoder, PredictionResult, SharedPredictor};
pub use config::{ConfigBuilder, PipelineConfig};
pub use dataset::{load_catalogue, parse_filename, AudioRecord, Catalogue, CatalogueSummary, Emotion, Gender};
pub use error::{
    AudioFormatError, ConfigError, DecodeError, ExtractionError, ModelLoadError, ParseMismatch,
    PredictionError, StatsError,
};
pub use pipeline::{extract_batch, feature_statistics, FeatureRow, FeatureTable, GroupBy};
