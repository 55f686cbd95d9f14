// src/classifier/tensor.rs
//
// Fixed-shape classifier input: five stacked 40-row channels (cepstrum,
// its first and second derivatives, mel power, chroma), each padded or
// truncated to 216 frames.

use ndarray::{Array3, Array4, Axis};

use crate::core::analysis::{delta, estimate_tuning, mel_spectrogram, mfcc_from_mel, transpose, MfccParams};
use crate::core::dsp::{chroma_filterbank, Spectrogram, StftProcessor};

/// Coefficient rows per channel
pub const TENSOR_ROWS: usize = 40;
/// Time frames per channel
pub const TENSOR_FRAMES: usize = 216;
/// Stacked channels
pub const TENSOR_CHANNELS: usize = 5;

const N_MELS: usize = 128;
const TOP_DB: f32 = 80.0;

/// STFT geometry used for the classifier features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorGeometry {
    pub n_fft: usize,
    pub hop_length: usize,
}

impl Default for TensorGeometry {
    fn default() -> Self {
        Self {
            n_fft: 2048,
            hop_length: 512,
        }
    }
}

/// Divide every frame by its maximum; silent frames stay zero
fn normalize_frames(frames: &mut [Vec<f32>]) {
    for frame in frames.iter_mut() {
        let peak = frame.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
        if peak > f32::MIN_POSITIVE {
            for v in frame.iter_mut() {
                *v /= peak;
            }
        }
    }
}

/// Chroma energy, chroma-major: `chroma[bin][frame]`. `tuning` is in
/// fractions of a chroma bin.
fn chromagram(power: &Spectrogram, sample_rate: u32, n_fft: usize, tuning: f32) -> Vec<Vec<f32>> {
    let bank = chroma_filterbank(sample_rate, n_fft, TENSOR_ROWS, tuning as f64);
    let mut frames = bank.apply(power);
    normalize_frames(&mut frames);
    transpose(&frames)
}

/// Build the `(40, 216, 5)` classifier tensor for a mono signal.
///
/// The shape does not depend on the signal length; an empty signal still
/// produces one (silent) analysis frame.
pub fn build_tensor(samples: &[f32], sample_rate: u32, geometry: TensorGeometry) -> Array3<f32> {
    let mut stft = StftProcessor::new(geometry.n_fft, geometry.hop_length);
    let power = stft.power(samples);

    let params = MfccParams {
        num_coefficients: TENSOR_ROWS,
        num_mel_bands: N_MELS,
        fft_size: geometry.n_fft,
        top_db: TOP_DB,
    };
    let mel = mel_spectrogram(&power, sample_rate, &params);
    let cepstrum = mfcc_from_mel(&mel, &params);
    let d1 = delta(&cepstrum, 1);
    let d2 = delta(&cepstrum, 2);
    let tuning = estimate_tuning(&power, sample_rate, geometry.n_fft, TENSOR_ROWS);
    let chroma = chromagram(&power, sample_rate, geometry.n_fft, tuning);

    log::debug!(
        "Classifier features: {} frames (kept {}), chroma tuning {:+.2}",
        power.n_frames(),
        power.n_frames().min(TENSOR_FRAMES),
        tuning
    );

    let channels: [&[Vec<f32>]; TENSOR_CHANNELS] = [&cepstrum, &d1, &d2, &mel, &chroma];
    let mut tensor = Array3::<f32>::zeros((TENSOR_ROWS, TENSOR_FRAMES, TENSOR_CHANNELS));
    for (c, rows) in channels.iter().enumerate() {
        for (r, row) in rows.iter().take(TENSOR_ROWS).enumerate() {
            for (t, &v) in row.iter().take(TENSOR_FRAMES).enumerate() {
                tensor[[r, t, c]] = v;
            }
        }
    }
    tensor
}

/// Add a leading batch axis of size 1
pub fn batch_of_one(tensor: Array3<f32>) -> Array4<f32> {
    tensor.insert_axis(Axis(0))
}
