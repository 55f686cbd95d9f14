// src/core/analysis/mfcc.rs
//
// Mel spectrogram, cepstral coefficients and their time derivatives

use crate::core::dsp::{dct_matrix, mel_filterbank, power_to_db, Spectrogram};

/// Cepstral analysis parameters
#[derive(Debug, Clone)]
pub struct MfccParams {
    pub num_coefficients: usize,
    pub num_mel_bands: usize,
    pub fft_size: usize,
    pub top_db: f32,
}

impl Default for MfccParams {
    fn default() -> Self {
        Self {
            num_coefficients: 13,
            num_mel_bands: 128,
            fft_size: 2048,
            top_db: 80.0,
        }
    }
}

/// Width of the derivative window when the input is long enough
pub const DELTA_WIDTH: usize = 9;

/// Swap a `[a][b]` matrix to `[b][a]`
pub fn transpose(rows: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let n_cols = rows.first().map(Vec::len).unwrap_or(0);
    (0..n_cols)
        .map(|c| rows.iter().map(|r| r[c]).collect())
        .collect()
}

/// Mel power spectrogram, band-major: `mel[band][frame]`
pub fn mel_spectrogram(power: &Spectrogram, sample_rate: u32, params: &MfccParams) -> Vec<Vec<f32>> {
    let bank = mel_filterbank(sample_rate, params.fft_size, params.num_mel_bands);
    transpose(&bank.apply(power))
}

/// Cepstral coefficients from a band-major mel power spectrogram,
/// coefficient-major: `mfcc[coef][frame]`
pub fn mfcc_from_mel(mel: &[Vec<f32>], params: &MfccParams) -> Vec<Vec<f32>> {
    let n_frames = mel.first().map(Vec::len).unwrap_or(0);
    let db = power_to_db(mel, params.top_db);
    let dct = dct_matrix(params.num_coefficients, mel.len());

    dct.iter()
        .map(|basis| {
            (0..n_frames)
                .map(|t| basis.iter().zip(&db).map(|(w, band)| w * band[t]).sum())
                .collect()
        })
        .collect()
}

/// Cepstral coefficients straight from a power spectrogram
pub fn mfcc(power: &Spectrogram, sample_rate: u32, params: &MfccParams) -> Vec<Vec<f32>> {
    mfcc_from_mel(&mel_spectrogram(power, sample_rate, params), params)
}

/// Savitzky-Golay derivative weights for offsets `-half..=half`
fn delta_weights(width: usize, order: usize) -> Vec<f32> {
    let half = (width / 2) as i64;
    let offsets: Vec<f64> = (-half..=half).map(|n| n as f64).collect();
    let sum_n2: f64 = offsets.iter().map(|n| n * n).sum();

    let weights: Vec<f64> = match order {
        1 => offsets.iter().map(|n| n / sum_n2).collect(),
        _ => {
            let m = sum_n2 / width as f64;
            let sum_n4: f64 = offsets.iter().map(|n| n.powi(4)).sum();
            let denom = sum_n4 - width as f64 * m * m;
            offsets.iter().map(|n| 2.0 * (n * n - m) / denom).collect()
        }
    };
    weights.into_iter().map(|w| w as f32).collect()
}

/// Local derivative of every row along time.
///
/// `order` 1 fits a line, 2 fits a quadratic. Edge frames take the value of
/// the nearest fully covered frame; the window shrinks to the largest odd
/// width that fits, and rows shorter than three frames give zeros.
pub fn delta(rows: &[Vec<f32>], order: usize) -> Vec<Vec<f32>> {
    rows.iter().map(|row| delta_row(row, order)).collect()
}

fn delta_row(row: &[f32], order: usize) -> Vec<f32> {
    let n = row.len();
    let mut width = DELTA_WIDTH.min(n);
    if width % 2 == 0 {
        width = width.saturating_sub(1);
    }
    if width < 3 {
        return vec![0.0; n];
    }

    let weights = delta_weights(width, order.clamp(1, 2));
    let half = width / 2;
    let interior: Vec<f32> = (half..n - half)
        .map(|t| {
            weights
                .iter()
                .enumerate()
                .map(|(i, w)| w * row[t + i - half])
                .sum()
        })
        .collect();

    let first = interior[0];
    let last = interior[interior.len() - 1];
    let mut out = Vec::with_capacity(n);
    out.extend(std::iter::repeat(first).take(half));
    out.extend_from_slice(&interior);
    out.extend(std::iter::repeat(last).take(half));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dsp::StftProcessor;

    #[test]
    fn test_delta_of_ramp() {
        let ramp: Vec<f32> = (0..20).map(|i| 2.0 * i as f32).collect();
        let d1 = delta(&[ramp.clone()], 1);
        assert!(d1[0].iter().all(|&v| (v - 2.0).abs() < 1e-4));
        let d2 = delta(&[ramp], 2);
        assert!(d2[0].iter().all(|&v| v.abs() < 1e-4));
    }

    #[test]
    fn test_delta2_of_parabola() {
        let parabola: Vec<f32> = (0..15).map(|i| (i * i) as f32).collect();
        let d2 = delta(&[parabola], 2);
        assert!(d2[0].iter().all(|&v| (v - 2.0).abs() < 1e-3), "{:?}", d2[0]);
    }

    #[test]
    fn test_delta_short_inputs() {
        assert_eq!(delta(&[vec![1.0, 2.0]], 1), vec![vec![0.0, 0.0]]);
        // Four frames shrink the window to three
        let d = delta(&[vec![0.0, 1.0, 2.0, 3.0]], 1);
        assert!(d[0].iter().all(|&v| (v - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_mfcc_shape() {
        let samples: Vec<f32> = (0..22050).map(|i| ((i as f32) * 0.05).sin() * 0.5).collect();
        let mut stft = StftProcessor::new(2048, 512);
        let power = stft.power(&samples);
        let coeffs = mfcc(&power, 22050, &MfccParams::default());
        assert_eq!(coeffs.len(), 13);
        assert_eq!(coeffs[0].len(), power.n_frames());
        assert!(coeffs.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_transpose() {
        let m = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        assert_eq!(transpose(&m), vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
    }
}
