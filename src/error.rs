// src/error.rs
//
// Error taxonomy. Per-file errors are recoverable values; only
// `ModelLoadError` is treated as fatal by callers.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Why a filename did not match the dataset naming convention
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ParseMismatch {
    #[error("expected 7 hyphen-delimited tokens, found {0}")]
    TokenCount(usize),
    #[error("actor id '{0}' is not an integer")]
    ActorId(String),
    #[error("filename has no stem")]
    EmptyStem,
}

impl ParseMismatch {
    /// Stable bucket name for diagnostics
    pub fn category(&self) -> &'static str {
        match self {
            ParseMismatch::TokenCount(_) => "wrong token count",
            ParseMismatch::ActorId(_) => "non-integer actor id",
            ParseMismatch::EmptyStem => "empty filename",
        }
    }
}

/// Failures while reading, converting or writing WAV bytes
#[derive(Debug, Error)]
pub enum AudioFormatError {
    #[error("malformed WAV data: {0}")]
    Decode(String),
    #[error("unsupported sample width: {0} bit")]
    UnsupportedSampleWidth(u16),
    #[error("unsupported sample format (only integer PCM is accepted)")]
    UnsupportedSampleFormat,
    #[error("cannot convert {from} channel(s) to {to}; only downmix to mono is supported")]
    UnsupportedChannelConversion { from: u16, to: u16 },
    #[error("invalid conversion target: {0}")]
    InvalidTarget(String),
    #[error("failed to encode WAV: {0}")]
    Encode(String),
}

impl From<hound::Error> for AudioFormatError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::Unsupported => AudioFormatError::UnsupportedSampleFormat,
            other => AudioFormatError::Decode(other.to_string()),
        }
    }
}

/// Failures while decoding an audio file from disk
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to probe format of {0}")]
    Probe(PathBuf),
    #[error("no supported audio track in {0}")]
    NoTrack(PathBuf),
    #[error("{0} does not specify a sample rate")]
    NoSampleRate(PathBuf),
    #[error("decoder error: {0}")]
    Codec(String),
}

/// Reasons a descriptive feature extraction produced no result
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("signal is empty")]
    EmptySignal,
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("feature '{0}' is not finite")]
    NonFinite(String),
}

/// Missing or corrupt classifier artefacts. Fatal at first use.
#[derive(Debug, Clone, Error)]
pub enum ModelLoadError {
    #[error("model file not found: {0}")]
    ModelMissing(PathBuf),
    #[error("label encoder file not found: {0}")]
    EncoderMissing(PathBuf),
    #[error("malformed label encoder {path}: {reason}")]
    EncoderMalformed { path: PathBuf, reason: String },
    #[error("failed to load model {path}: {reason}")]
    ModelMalformed { path: PathBuf, reason: String },
    #[error("no inference backend compiled in (enable the `onnx` feature)")]
    BackendUnavailable,
}

/// Failures during a single prediction. `Model` wraps the fatal load error.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Model(#[from] ModelLoadError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("model returned {got} scores but the encoder knows {expected} classes")]
    ClassCountMismatch { expected: usize, got: usize },
    #[error("model returned no scores")]
    EmptyOutput,
}

/// Invalid configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Invalid requests against a feature table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("unknown feature '{0}'")]
    UnknownFeature(String),
    #[error("unknown grouping '{0}' (expected emotion, gender, intensity, statement or actor)")]
    UnknownGrouping(String),
}
