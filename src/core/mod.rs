//! Core signal processing, decoding, normalisation and analysis

pub mod analysis;
pub mod analyzer;
pub mod decoder;
pub mod dsp;
pub mod wav;

pub use analysis::{extract, extract_file, AcousticFeatures, FEATURE_NAMES};
pub use analyzer::{AnalyzerBuilder, EmotionAnalyzer};
pub use decoder::{decode_file, load_mono, DecodedAudio};
pub use wav::{
    decode_wav, normalize_audio, read_audio_properties, try_convert, AudioProperties,
    ConversionStatus, NormalizedAudio,
};
