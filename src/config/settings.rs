// src/config/settings.rs
//
// Pipeline configuration: feature-extraction parameters, normalisation
// targets and classifier artefact locations.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::analysis::NUM_MFCC;
use crate::error::ConfigError;

/// Parameters of the descriptive feature extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureParams {
    /// FFT size (also the analysis frame length)
    pub n_fft: usize,
    /// Hop between frames in samples
    pub hop_length: usize,
    /// Mel bands feeding the cepstral transform
    pub n_mels: usize,
    /// Lowest pitch candidate in Hz
    pub pitch_fmin: f32,
    /// Upper bound (exclusive) for pitch candidates in Hz
    pub pitch_fmax: f32,
    /// Candidate threshold relative to the frame maximum
    pub pitch_threshold: f32,
    /// Energy fraction for spectral rolloff
    pub rolloff_percent: f32,
    /// Dynamic range floor for dB conversions
    pub top_db: f32,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            n_fft: 2048,
            hop_length: 512,
            n_mels: 128,
            pitch_fmin: 150.0,
            pitch_fmax: 4000.0,
            pitch_threshold: 0.1,
            rolloff_percent: 0.85,
            top_db: 80.0,
        }
    }
}

/// Default target for WAV normalisation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeParams {
    pub target_channels: u16,
    pub target_rate: u32,
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            target_channels: 1,
            target_rate: 48000,
        }
    }
}

/// Classifier artefacts and tensor geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Serialized model (ONNX)
    pub model_path: PathBuf,
    /// JSON array of class labels in encoder order
    pub encoder_path: PathBuf,
    /// Rate every input is decoded at before tensor construction
    pub sample_rate: u32,
    pub n_fft: usize,
    pub hop_length: usize,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/emotion_model.onnx"),
            encoder_path: PathBuf::from("models/label_encoder.json"),
            sample_rate: 22050,
            n_fft: 2048,
            hop_length: 512,
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub features: FeatureParams,
    pub normalize: NormalizeParams,
    pub classifier: ClassifierParams,
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Missing keys take defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Per-user config location, if the platform has one
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("emocheckr").join("config.json"))
    }

    /// Load from `path` if given, else from the per-user location if it
    /// exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::default_location() {
            Some(location) if location.is_file() => {
                log::debug!("Loading config from {}", location.display());
                Self::from_file(&location)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.features;
        if f.n_fft == 0 || f.hop_length == 0 {
            return Err(ConfigError::Invalid("n_fft and hop_length must be non-zero".into()));
        }
        if f.hop_length > f.n_fft {
            return Err(ConfigError::Invalid(format!(
                "hop_length {} exceeds n_fft {}",
                f.hop_length, f.n_fft
            )));
        }
        if f.n_mels < NUM_MFCC {
            return Err(ConfigError::Invalid(format!(
                "n_mels {} is below the {} cepstral coefficients",
                f.n_mels, NUM_MFCC
            )));
        }
        if f.pitch_fmin >= f.pitch_fmax {
            return Err(ConfigError::Invalid(format!(
                "pitch_fmin {} must be below pitch_fmax {}",
                f.pitch_fmin, f.pitch_fmax
            )));
        }
        if !(0.0..=1.0).contains(&f.rolloff_percent) {
            return Err(ConfigError::Invalid("rolloff_percent must be in [0, 1]".into()));
        }
        if self.normalize.target_rate == 0 || self.normalize.target_channels == 0 {
            return Err(ConfigError::Invalid("normalisation target must be non-zero".into()));
        }
        let c = &self.classifier;
        if c.sample_rate == 0 || c.n_fft == 0 || c.hop_length == 0 {
            return Err(ConfigError::Invalid("classifier geometry must be non-zero".into()));
        }
        Ok(())
    }
}

/// Fluent builder for `PipelineConfig`
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: PipelineConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn fft(mut self, n_fft: usize, hop_length: usize) -> Self {
        self.config.features.n_fft = n_fft;
        self.config.features.hop_length = hop_length;
        self
    }

    pub fn pitch_range(mut self, fmin: f32, fmax: f32) -> Self {
        self.config.features.pitch_fmin = fmin;
        self.config.features.pitch_fmax = fmax;
        self
    }

    pub fn normalize_target(mut self, channels: u16, rate: u32) -> Self {
        self.config.normalize.target_channels = channels;
        self.config.normalize.target_rate = rate;
        self
    }

    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.classifier.model_path = path.into();
        self
    }

    pub fn encoder_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.classifier.encoder_path = path.into();
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
