//! Descriptive acoustic analysis
//!
//! - Pitch tracking (peak picking with parabolic refinement)
//! - Spectral shape (centroid, rolloff)
//! - Mel spectrogram, MFCC and time derivatives
//! - The fixed 35-field feature vector built from all of the above

mod features;
mod mfcc;
mod pitch;
mod spectral;

pub use features::{
    basic_feature_descriptions, basic_feature_names, extract, extract_file, is_feature_name,
    mfcc_feature_descriptions, mfcc_feature_names, AcousticFeatures, FeatureDescription,
    FEATURE_COUNT, FEATURE_NAMES, NUM_MFCC,
};
pub use mfcc::{delta, mel_spectrogram, mfcc, mfcc_from_mel, transpose, MfccParams, DELTA_WIDTH};
pub use pitch::{
    dominant_pitch_track, estimate_tuning, frame_candidates, pitch_tuning, voiced, PitchCandidate, PitchParams,
};
pub use spectral::{spectral_centroid, spectral_rolloff};
