//! Filter banks: Slaney mel, octave-folded chroma, orthonormal DCT

use std::f64::consts::PI;

use super::fft::Spectrogram;

const MEL_F_SP: f64 = 200.0 / 3.0;
const MEL_MIN_LOG_HZ: f64 = 1000.0;
const MEL_MIN_LOG_MEL: f64 = MEL_MIN_LOG_HZ / MEL_F_SP;

fn mel_log_step() -> f64 {
    6.4f64.ln() / 27.0
}

/// Hz to mel on the Slaney scale (linear below 1 kHz, logarithmic above)
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz < MEL_MIN_LOG_HZ {
        hz / MEL_F_SP
    } else {
        MEL_MIN_LOG_MEL + (hz / MEL_MIN_LOG_HZ).ln() / mel_log_step()
    }
}

pub fn mel_to_hz(mel: f64) -> f64 {
    if mel < MEL_MIN_LOG_MEL {
        mel * MEL_F_SP
    } else {
        MEL_MIN_LOG_HZ * (mel_log_step() * (mel - MEL_MIN_LOG_MEL)).exp()
    }
}

/// Dense filter bank: `weights[band][bin]`
#[derive(Debug, Clone)]
pub struct FilterBank {
    pub weights: Vec<Vec<f32>>,
}

impl FilterBank {
    pub fn n_bands(&self) -> usize {
        self.weights.len()
    }

    /// Project every frame of `spec` onto the bank
    pub fn apply(&self, spec: &Spectrogram) -> Vec<Vec<f32>> {
        spec.frames
            .iter()
            .map(|frame| {
                self.weights
                    .iter()
                    .map(|band| band.iter().zip(frame).map(|(w, s)| w * s).sum())
                    .collect()
            })
            .collect()
    }
}

/// Triangular mel filters from 0 Hz to Nyquist with Slaney area normalisation
pub fn mel_filterbank(sample_rate: u32, n_fft: usize, n_mels: usize) -> FilterBank {
    let n_bins = n_fft / 2 + 1;
    let fmax = sample_rate as f64 / 2.0;
    let mel_max = hz_to_mel(fmax);

    let mel_points: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_max * i as f64 / (n_mels + 1) as f64))
        .collect();
    let fft_freqs: Vec<f64> = (0..n_bins)
        .map(|k| k as f64 * sample_rate as f64 / n_fft as f64)
        .collect();

    let weights = (0..n_mels)
        .map(|m| {
            let (left, centre, right) = (mel_points[m], mel_points[m + 1], mel_points[m + 2]);
            let enorm = 2.0 / (right - left);
            fft_freqs
                .iter()
                .map(|&f| {
                    let lower = (f - left) / (centre - left);
                    let upper = (right - f) / (right - centre);
                    (lower.min(upper).max(0.0) * enorm) as f32
                })
                .collect()
        })
        .collect();

    FilterBank { weights }
}

/// Chroma filter bank with `n_chroma` bins per octave, centred on octave 5
/// with a two-octave Gaussian weighting, starting at C.
///
/// `tuning` is the deviation from A440 in fractions of a chroma bin.
pub fn chroma_filterbank(sample_rate: u32, n_fft: usize, n_chroma: usize, tuning: f64) -> FilterBank {
    const CENTER_OCTAVE: f64 = 5.0;
    const OCTAVE_WIDTH: f64 = 2.0;

    let n_chroma_f = n_chroma as f64;
    let a440 = 440.0 * 2f64.powf(tuning / n_chroma_f);
    let octs = |hz: f64| (hz / (a440 / 16.0)).log2();

    // frqbins[k] for every FFT bin k in 0..n_fft; bin 0 is extrapolated
    let mut frqbins = vec![0.0f64; n_fft];
    for (k, slot) in frqbins.iter_mut().enumerate().skip(1) {
        *slot = n_chroma_f * octs(k as f64 * sample_rate as f64 / n_fft as f64);
    }
    if n_fft > 1 {
        frqbins[0] = frqbins[1] - 1.5 * n_chroma_f;
    }

    let mut binwidths = vec![1.0f64; n_fft];
    for k in 0..n_fft.saturating_sub(1) {
        binwidths[k] = (frqbins[k + 1] - frqbins[k]).max(1.0);
    }

    let half = (n_chroma_f / 2.0).round();
    let mut weights = vec![vec![0.0f64; n_fft]; n_chroma];
    for k in 0..n_fft {
        for (c, row) in weights.iter_mut().enumerate() {
            let d = frqbins[k] - c as f64;
            let d = (d + half + 10.0 * n_chroma_f).rem_euclid(n_chroma_f) - half;
            row[k] = (-0.5 * (2.0 * d / binwidths[k]).powi(2)).exp();
        }

        let norm = weights.iter().map(|row| row[k] * row[k]).sum::<f64>().sqrt();
        let octave_weight =
            (-0.5 * ((frqbins[k] / n_chroma_f - CENTER_OCTAVE) / OCTAVE_WIDTH).powi(2)).exp();
        for row in weights.iter_mut() {
            if norm > f64::MIN_POSITIVE {
                row[k] /= norm;
            }
            row[k] *= octave_weight;
        }
    }

    // Rotate so the first bin is C rather than A
    let shift = 3 * (n_chroma / 12);
    let n_bins = n_fft / 2 + 1;
    let weights = (0..n_chroma)
        .map(|c| {
            weights[(c + shift) % n_chroma][..n_bins]
                .iter()
                .map(|&w| w as f32)
                .collect()
        })
        .collect();

    FilterBank { weights }
}

/// Orthonormal DCT-II matrix, `n_out` rows by `n_in` columns
pub fn dct_matrix(n_out: usize, n_in: usize) -> Vec<Vec<f32>> {
    let n = n_in as f64;
    (0..n_out)
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            (0..n_in)
                .map(|i| (scale * (PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n)).cos()) as f32)
                .collect()
        })
        .collect()
}

/// Power to dB relative to 1.0, floored at `top_db` below the global peak
pub fn power_to_db(frames: &[Vec<f32>], top_db: f32) -> Vec<Vec<f32>> {
    const AMIN: f32 = 1e-10;
    let mut db: Vec<Vec<f32>> = frames
        .iter()
        .map(|f| f.iter().map(|&p| 10.0 * p.max(AMIN).log10()).collect())
        .collect();

    let peak = db
        .iter()
        .flat_map(|f| f.iter().copied())
        .fold(f32::NEG_INFINITY, f32::max);
    if peak.is_finite() {
        let floor = peak - top_db;
        for value in db.iter_mut().flat_map(|f| f.iter_mut()) {
            *value = value.max(floor);
        }
    }
    db
}
