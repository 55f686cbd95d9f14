//! Short-time Fourier transform with centred, zero-padded frames

use num_complex::Complex;
use rustfft::FftPlanner;

use super::windows::{create_window, WindowType};

/// Frame-major spectrogram: `frames[t][k]` is bin `k` of frame `t`
#[derive(Debug, Clone, Default)]
pub struct Spectrogram {
    pub frames: Vec<Vec<f32>>,
    pub n_bins: usize,
}

impl Spectrogram {
    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Element-wise square (magnitude to power)
    pub fn squared(&self) -> Spectrogram {
        Spectrogram {
            frames: self
                .frames
                .iter()
                .map(|f| f.iter().map(|m| m * m).collect())
                .collect(),
            n_bins: self.n_bins,
        }
    }
}

/// STFT computation with a periodic Hann window
pub struct StftProcessor {
    planner: FftPlanner<f32>,
    window: Vec<f32>,
    n_fft: usize,
    hop_length: usize,
}

impl StftProcessor {
    pub fn new(n_fft: usize, hop_length: usize) -> Self {
        let window = create_window(n_fft, WindowType::Hann)
            .into_iter()
            .map(|w| w as f32)
            .collect();
        Self {
            planner: FftPlanner::new(),
            window,
            n_fft,
            hop_length: hop_length.max(1),
        }
    }

    /// Number of centred frames for a signal of `len` samples
    pub fn frame_count(&self, len: usize) -> usize {
        1 + len / self.hop_length
    }

    /// Magnitude spectrogram (`n_fft / 2 + 1` bins per frame)
    pub fn magnitude(&mut self, samples: &[f32]) -> Spectrogram {
        let n_bins = self.n_fft / 2 + 1;
        let pad = self.n_fft / 2;
        let n_frames = self.frame_count(samples.len());
        let fft = self.planner.plan_fft_forward(self.n_fft);

        let mut frames = Vec::with_capacity(n_frames);
        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.n_fft];

        for t in 0..n_frames {
            // Frame t spans padded[t * hop .. t * hop + n_fft]; padding is zeros
            let start = (t * self.hop_length) as isize - pad as isize;
            for (i, slot) in buffer.iter_mut().enumerate() {
                let idx = start + i as isize;
                let sample = if idx >= 0 && (idx as usize) < samples.len() {
                    samples[idx as usize]
                } else {
                    0.0
                };
                *slot = Complex::new(sample * self.window[i], 0.0);
            }

            fft.process(&mut buffer);
            frames.push(buffer[..n_bins].iter().map(|c| c.norm()).collect());
        }

        Spectrogram { frames, n_bins }
    }

    /// Power spectrogram (squared magnitude)
    pub fn power(&mut self, samples: &[f32]) -> Spectrogram {
        self.magnitude(samples).squared()
    }
}

/// Centre frequency in Hz of every bin of an `n_fft` transform
pub fn fft_frequencies(sample_rate: u32, n_fft: usize) -> Vec<f32> {
    (0..=n_fft / 2)
        .map(|k| k as f32 * sample_rate as f32 / n_fft as f32)
        .collect()
}
