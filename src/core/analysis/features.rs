// src/core/analysis/features.rs
//
// Fixed-schema descriptive feature vector: energy, pitch, spectral shape
// and 13 cepstral coefficients summarised over time.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::mfcc::{mfcc, MfccParams};
use super::pitch::{dominant_pitch_track, voiced, PitchParams};
use super::spectral::{spectral_centroid, spectral_rolloff};
use crate::config::FeatureParams;
use crate::core::decoder::load_mono;
use crate::core::dsp::stats::{amplitude_to_db_relative, frame_rms, frame_zero_crossing_rate, mean, std_dev};
use crate::core::dsp::{fft_frequencies, StftProcessor};
use crate::error::ExtractionError;

/// Number of cepstral coefficients summarised
pub const NUM_MFCC: usize = 13;

/// Number of scalar fields in [`AcousticFeatures`]
pub const FEATURE_COUNT: usize = 9 + 2 * NUM_MFCC;

/// Scalar names in schema order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "duration",
    "rms_mean",
    "rms_std",
    "pitch_mean",
    "pitch_std",
    "spectral_centroid_mean",
    "spectral_centroid_std",
    "spectral_rolloff_mean",
    "zcr_mean",
    "mfcc_1_mean",
    "mfcc_1_std",
    "mfcc_2_mean",
    "mfcc_2_std",
    "mfcc_3_mean",
    "mfcc_3_std",
    "mfcc_4_mean",
    "mfcc_4_std",
    "mfcc_5_mean",
    "mfcc_5_std",
    "mfcc_6_mean",
    "mfcc_6_std",
    "mfcc_7_mean",
    "mfcc_7_std",
    "mfcc_8_mean",
    "mfcc_8_std",
    "mfcc_9_mean",
    "mfcc_9_std",
    "mfcc_10_mean",
    "mfcc_10_std",
    "mfcc_11_mean",
    "mfcc_11_std",
    "mfcc_12_mean",
    "mfcc_12_std",
    "mfcc_13_mean",
    "mfcc_13_std",
];

/// Descriptive features of one recording. Either every field is finite or
/// the extraction failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcousticFeatures {
    /// Seconds
    pub duration: f32,
    /// dB relative to the loudest frame
    pub rms_mean: f32,
    pub rms_std: f32,
    /// Hz over voiced frames, 0 when nothing is voiced
    pub pitch_mean: f32,
    pub pitch_std: f32,
    pub spectral_centroid_mean: f32,
    pub spectral_centroid_std: f32,
    pub spectral_rolloff_mean: f32,
    pub zcr_mean: f32,
    pub mfcc_mean: [f32; NUM_MFCC],
    pub mfcc_std: [f32; NUM_MFCC],
}

impl AcousticFeatures {
    /// `(name, value)` pairs in schema order
    pub fn named_values(&self) -> Vec<(&'static str, f32)> {
        let mut values = vec![
            self.duration,
            self.rms_mean,
            self.rms_std,
            self.pitch_mean,
            self.pitch_std,
            self.spectral_centroid_mean,
            self.spectral_centroid_std,
            self.spectral_rolloff_mean,
            self.zcr_mean,
        ];
        for i in 0..NUM_MFCC {
            values.push(self.mfcc_mean[i]);
            values.push(self.mfcc_std[i]);
        }
        FEATURE_NAMES.iter().copied().zip(values).collect()
    }

    /// Look a scalar up by its schema name
    pub fn value(&self, name: &str) -> Option<f32> {
        let base = match name {
            "duration" => Some(self.duration),
            "rms_mean" => Some(self.rms_mean),
            "rms_std" => Some(self.rms_std),
            "pitch_mean" => Some(self.pitch_mean),
            "pitch_std" => Some(self.pitch_std),
            "spectral_centroid_mean" => Some(self.spectral_centroid_mean),
            "spectral_centroid_std" => Some(self.spectral_centroid_std),
            "spectral_rolloff_mean" => Some(self.spectral_rolloff_mean),
            "zcr_mean" => Some(self.zcr_mean),
            _ => None,
        };
        base.or_else(|| {
            let rest = name.strip_prefix("mfcc_")?;
            let (index, stat) = rest.split_once('_')?;
            let i = index.parse::<usize>().ok()?.checked_sub(1)?;
            match stat {
                "mean" => self.mfcc_mean.get(i).copied(),
                "std" => self.mfcc_std.get(i).copied(),
                _ => None,
            }
        })
    }

    fn ensure_finite(self) -> Result<Self, ExtractionError> {
        match self.named_values().into_iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(ExtractionError::NonFinite(name.to_string())),
            None => Ok(self),
        }
    }
}

pub fn is_feature_name(name: &str) -> bool {
    FEATURE_NAMES.contains(&name)
}

/// Compute the descriptive features of a mono signal
pub fn extract(
    samples: &[f32],
    sample_rate: u32,
    params: &FeatureParams,
) -> Result<AcousticFeatures, ExtractionError> {
    if samples.is_empty() {
        return Err(ExtractionError::EmptySignal);
    }
    if sample_rate == 0 {
        return Err(ExtractionError::InvalidSampleRate(sample_rate));
    }

    let duration = samples.len() as f32 / sample_rate as f32;

    let rms = frame_rms(samples, params.n_fft, params.hop_length);
    let rms_db = amplitude_to_db_relative(&rms, params.top_db);

    let mut stft = StftProcessor::new(params.n_fft, params.hop_length);
    let magnitude = stft.magnitude(samples);
    let freqs = fft_frequencies(sample_rate, params.n_fft);

    let pitch_params = PitchParams {
        fmin: params.pitch_fmin,
        fmax: params.pitch_fmax,
        threshold: params.pitch_threshold,
    };
    let pitches = voiced(&dominant_pitch_track(&magnitude, sample_rate, params.n_fft, &pitch_params));
    log::debug!("{} of {} frames voiced", pitches.len(), magnitude.n_frames());

    let centroid = spectral_centroid(&magnitude, &freqs);
    let rolloff = spectral_rolloff(&magnitude, &freqs, params.rolloff_percent);
    let zcr = frame_zero_crossing_rate(samples, params.n_fft, params.hop_length);

    let mfcc_params = MfccParams {
        num_coefficients: NUM_MFCC,
        num_mel_bands: params.n_mels,
        fft_size: params.n_fft,
        top_db: params.top_db,
    };
    let coefficients = mfcc(&magnitude.squared(), sample_rate, &mfcc_params);

    let mut mfcc_mean = [0.0f32; NUM_MFCC];
    let mut mfcc_std = [0.0f32; NUM_MFCC];
    for (i, row) in coefficients.iter().enumerate().take(NUM_MFCC) {
        mfcc_mean[i] = mean(row);
        mfcc_std[i] = std_dev(row);
    }

    AcousticFeatures {
        duration,
        rms_mean: mean(&rms_db),
        rms_std: std_dev(&rms_db),
        pitch_mean: mean(&pitches),
        pitch_std: std_dev(&pitches),
        spectral_centroid_mean: mean(&centroid),
        spectral_centroid_std: std_dev(&centroid),
        spectral_rolloff_mean: mean(&rolloff),
        zcr_mean: mean(&zcr),
        mfcc_mean,
        mfcc_std,
    }
    .ensure_finite()
}

/// Decode a file at its native rate, mix to mono and extract features
pub fn extract_file(path: &Path, params: &FeatureParams) -> Result<AcousticFeatures, ExtractionError> {
    let audio = load_mono(path, None)?;
    extract(&audio.samples, audio.sample_rate, params)
}

/// Human-facing description of a feature
#[derive(Debug, Clone, Serialize)]
pub struct FeatureDescription {
    pub key: String,
    pub name: String,
    pub description: String,
    pub unit: String,
    pub interpretation: String,
}

/// The headline features shown in summaries
pub fn basic_feature_names() -> Vec<&'static str> {
    vec![
        "duration",
        "rms_mean",
        "pitch_mean",
        "spectral_centroid_mean",
        "zcr_mean",
    ]
}

/// `mfcc_N_mean` for every coefficient
pub fn mfcc_feature_names() -> Vec<String> {
    (1..=NUM_MFCC).map(|i| format!("mfcc_{}_mean", i)).collect()
}

fn describe(key: &str, name: &str, description: &str, unit: &str, interpretation: &str) -> FeatureDescription {
    FeatureDescription {
        key: key.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        unit: unit.to_string(),
        interpretation: interpretation.to_string(),
    }
}

/// Descriptions of the basic features
pub fn basic_feature_descriptions() -> Vec<FeatureDescription> {
    vec![
        describe(
            "duration",
            "Duration",
            "Length of the recording",
            "seconds",
            "Reflects speaking tempo differences between emotions.",
        ),
        describe(
            "rms_mean",
            "Loudness (RMS)",
            "Average energy of the recording",
            "dB",
            "Average loudness where 0 dB is the loudest frame of the same signal.",
        ),
        describe(
            "pitch_mean",
            "Pitch",
            "Average fundamental frequency of the voice",
            "Hz",
            "Often higher for fear, lower for sadness.",
        ),
        describe(
            "spectral_centroid_mean",
            "Spectral centroid",
            "Centre of mass of the spectrum",
            "Hz",
            "Brightness or sharpness of the voice.",
        ),
        describe(
            "zcr_mean",
            "Zero-crossing rate",
            "Fraction of sign changes per frame",
            "ratio (0-1)",
            "High for rough speech and fricatives, low for vowels and soft consonants.",
        ),
    ]
}

/// Descriptions of the cepstral mean features
pub fn mfcc_feature_descriptions() -> Vec<FeatureDescription> {
    mfcc_feature_names()
        .into_iter()
        .enumerate()
        .map(|(i, key)| {
            let region = match i {
                0 => "overall spectral envelope",
                1..=3 => "mid-frequency and formant structure",
                4..=7 => "articulation and modulation detail",
                _ => "fine high-frequency timbre",
            };
            FeatureDescription {
                name: format!("MFCC {}", i + 1),
                description: format!("Cepstral coefficient {} averaged over time", i + 1),
                unit: "dimensionless".to_string(),
                interpretation: format!("Sensitive to {}.", region),
                key,
            }
        })
        .collect()
}
