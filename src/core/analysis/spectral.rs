// src/core/analysis/spectral.rs
//
// Per-frame spectral shape descriptors over a magnitude spectrogram

use crate::core::dsp::Spectrogram;

/// Magnitude-weighted mean frequency of each frame. Silent frames give 0.
pub fn spectral_centroid(spec: &Spectrogram, freqs: &[f32]) -> Vec<f32> {
    spec.frames
        .iter()
        .map(|frame| {
            let total: f64 = frame.iter().map(|&m| m as f64).sum();
            if total <= f64::MIN_POSITIVE {
                return 0.0;
            }
            let weighted: f64 = frame
                .iter()
                .zip(freqs)
                .map(|(&m, &f)| m as f64 * f as f64)
                .sum();
            (weighted / total) as f32
        })
        .collect()
}

/// Lowest bin frequency at which the cumulative magnitude reaches
/// `roll_percent` of the frame total
pub fn spectral_rolloff(spec: &Spectrogram, freqs: &[f32], roll_percent: f32) -> Vec<f32> {
    spec.frames
        .iter()
        .map(|frame| {
            let total: f64 = frame.iter().map(|&m| m as f64).sum();
            let threshold = roll_percent as f64 * total;
            let mut cumulative = 0.0f64;
            for (&m, &f) in frame.iter().zip(freqs) {
                cumulative += m as f64;
                if cumulative >= threshold {
                    return f;
                }
            }
            freqs.last().copied().unwrap_or(0.0)
        })
        .collect()
}
