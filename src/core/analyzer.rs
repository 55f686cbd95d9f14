// src/core/analyzer.rs
//
// High-level API with builder pattern. Owns the configuration, the memo
// caches and the lazily loaded classifier.

use std::path::Path;
use std::sync::Arc;

use super::analysis::{extract_file, AcousticFeatures};
use super::wav::{self, AudioProperties, NormalizedAudio};
use crate::classifier::{EmotionPredictor, PredictionResult, SharedPredictor};
use crate::config::PipelineConfig;
use crate::dataset::{Catalogue, CatalogueCache};
use crate::error::{AudioFormatError, ExtractionError, ModelLoadError, PredictionError};
use crate::pipeline::{BatchProgress, FeatureTable, FeatureTableCache};

/// Builder for EmotionAnalyzer configuration
pub struct AnalyzerBuilder {
    config: PipelineConfig,
    predictor: Option<EmotionPredictor>,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            predictor: None,
        }
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn normalize_target(mut self, channels: u16, rate: u32) -> Self {
        self.config.normalize.target_channels = channels;
        self.config.normalize.target_rate = rate;
        self
    }

    /// Use an already loaded predictor instead of the configured artefacts
    pub fn predictor(mut self, predictor: EmotionPredictor) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn build(self) -> EmotionAnalyzer {
        let classifier = self.config.classifier.clone();
        let predictor = match self.predictor {
            Some(p) => SharedPredictor::with_predictor(p, classifier),
            None => SharedPredictor::new(classifier),
        };
        EmotionAnalyzer {
            catalogues: CatalogueCache::new(),
            tables: FeatureTableCache::new(self.config.features.clone()),
            predictor,
            config: self.config,
        }
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry point for catalogue loading, feature extraction, WAV
/// normalisation and emotion prediction
pub struct EmotionAnalyzer {
    config: PipelineConfig,
    catalogues: CatalogueCache,
    tables: FeatureTableCache,
    predictor: SharedPredictor,
}

impl EmotionAnalyzer {
    /// Create analyzer with default configuration
    pub fn new() -> Self {
        AnalyzerBuilder::new().build()
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        AnalyzerBuilder::new().config(config).build()
    }

    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Catalogue of `root`, memoised per root. Never fails; a missing
    /// directory gives an empty catalogue.
    pub fn load_catalogue(&self, root: &Path) -> Arc<Catalogue> {
        self.catalogues.load(root)
    }

    pub fn extract_single_file_features(&self, path: &Path) -> Result<AcousticFeatures, ExtractionError> {
        extract_file(path, &self.config.features)
    }

    /// Feature table for `catalogue`, memoised per root and cap
    pub fn extract_batch_features<F>(
        &self,
        catalogue: &Catalogue,
        max_files: Option<usize>,
        on_progress: F,
    ) -> Arc<FeatureTable>
    where
        F: FnMut(&BatchProgress<'_>),
    {
        self.tables.load(catalogue, max_files, on_progress)
    }

    /// Normalise to the configured target format
    pub fn normalize_audio(&self, bytes: &[u8]) -> NormalizedAudio {
        let target = &self.config.normalize;
        wav::normalize_audio(bytes, target.target_channels, target.target_rate)
    }

    /// Normalise to an explicit target, ignoring the configured one
    pub fn normalize_audio_to(&self, bytes: &[u8], channels: u16, rate: u32) -> NormalizedAudio {
        wav::normalize_audio(bytes, channels, rate)
    }

    pub fn read_audio_properties(&self, bytes: &[u8]) -> Result<AudioProperties, AudioFormatError> {
        wav::read_audio_properties(bytes)
    }

    /// Force the classifier to load now
    pub fn load_predictor(&self) -> Result<Arc<EmotionPredictor>, ModelLoadError> {
        self.predictor.get()
    }

    pub fn predict_emotion(&self, path: &Path) -> Result<PredictionResult, PredictionError> {
        self.predictor.predict(path)
    }

    /// Drop every cached catalogue and feature table
    pub fn clear_caches(&self) {
        self.catalogues.clear();
        self.tables.clear();
    }
}

impl Default for EmotionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_is_empty() {
        let analyzer = EmotionAnalyzer::new();
        let catalogue = analyzer.load_catalogue(Path::new("/definitely/not/here"));
        assert!(catalogue.is_empty());
    }

    #[test]
    fn test_catalogue_is_memoised() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("03-01-01-01-01-01-01.wav"), b"").unwrap();
        let analyzer = EmotionAnalyzer::new();
        let first = analyzer.load_catalogue(dir.path());
        let second = analyzer.load_catalogue(dir.path());
        assert!(Arc::ptr_eq(&first, &second));

        analyzer.clear_caches();
        let third = analyzer.load_catalogue(dir.path());
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(first.len(), third.len());
    }

    #[test]
    fn test_explicit_target_overrides_config() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..800 {
                writer.write_sample(((i % 40) as i16 - 20) * 500).unwrap();
            }
            writer.finalize().unwrap();
        }

        let analyzer = EmotionAnalyzer::builder().normalize_target(1, 22050).build();
        let out = analyzer.normalize_audio_to(cursor.get_ref(), 1, 16000);
        assert!(out.is_converted());
        let reader = hound::WavReader::new(std::io::Cursor::new(out.bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.len(), 1600);
    }

    #[test]
    fn test_normalize_garbage_falls_back() {
        let analyzer = EmotionAnalyzer::builder().normalize_target(1, 16000).build();
        let out = analyzer.normalize_audio(b"RIFF????");
        assert!(!out.is_converted());
        assert_eq!(out.bytes, b"RIFF????");
    }
}
