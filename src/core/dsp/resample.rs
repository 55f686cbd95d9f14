//! Polyphase rational resampling
//!
//! The rate ratio is reduced to `up / down`; the signal is conceptually
//! zero-stuffed by `up`, low-pass filtered with a Kaiser-windowed sinc and
//! decimated by `down`. Only the taps that meet non-zero input samples are
//! evaluated.

use std::f64::consts::PI;

use super::windows::{create_window, WindowType};

const KAISER_BETA: f64 = 5.0;
const HALF_LEN_PER_RATE: usize = 10;

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Polyphase resampler for one fixed rate pair
#[derive(Debug, Clone)]
pub struct PolyphaseResampler {
    up: usize,
    down: usize,
    half_len: usize,
    taps: Vec<f64>,
}

impl PolyphaseResampler {
    /// Build the anti-aliasing filter for `source_rate -> target_rate`.
    /// Returns `None` if either rate is zero.
    pub fn new(source_rate: u32, target_rate: u32) -> Option<Self> {
        if source_rate == 0 || target_rate == 0 {
            return None;
        }
        let g = gcd(source_rate as u64, target_rate as u64);
        let up = (target_rate as u64 / g) as usize;
        let down = (source_rate as u64 / g) as usize;

        let max_rate = up.max(down);
        let half_len = HALF_LEN_PER_RATE * max_rate;
        let taps = if up == 1 && down == 1 {
            vec![1.0]
        } else {
            design_lowpass(2 * half_len + 1, 1.0 / max_rate as f64, up as f64)
        };

        Some(Self {
            up,
            down,
            half_len,
            taps,
        })
    }

    /// Output length for `n_in` input samples: ceil(n_in * up / down)
    pub fn output_len(&self, n_in: usize) -> usize {
        (n_in * self.up).div_ceil(self.down)
    }

    pub fn process(&self, input: &[f32]) -> Vec<f32> {
        if self.up == 1 && self.down == 1 {
            return input.to_vec();
        }

        let n_out = self.output_len(input.len());
        let upsampled_len = input.len() * self.up;
        let mut output = Vec::with_capacity(n_out);

        for n in 0..n_out {
            // Position in the zero-stuffed domain, delay-compensated
            let m = n * self.down + self.half_len;
            let mut k = m % self.up;
            let mut acc = 0.0f64;
            while k < self.taps.len() {
                if k <= m {
                    let j = m - k;
                    if j < upsampled_len {
                        acc += self.taps[k] * input[j / self.up] as f64;
                    }
                } else {
                    break;
                }
                k += self.up;
            }
            output.push(acc as f32);
        }

        output
    }
}

/// Windowed-sinc low-pass with unit DC gain, then scaled by `gain`.
/// `cutoff` is relative to Nyquist.
fn design_lowpass(num_taps: usize, cutoff: f64, gain: f64) -> Vec<f64> {
    let window = create_window(num_taps, WindowType::Kaiser(KAISER_BETA));
    let alpha = (num_taps - 1) as f64 / 2.0;

    let mut taps: Vec<f64> = (0..num_taps)
        .map(|i| {
            let x = cutoff * (i as f64 - alpha);
            let sinc = if x.abs() < 1e-12 { 1.0 } else { (PI * x).sin() / (PI * x) };
            cutoff * sinc * window[i]
        })
        .collect();

    let sum: f64 = taps.iter().sum();
    if sum.abs() > f64::EPSILON {
        for t in taps.iter_mut() {
            *t = *t / sum * gain;
        }
    }
    taps
}

/// Resample one channel from `source_rate` to `target_rate`
pub fn resample(input: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    match PolyphaseResampler::new(source_rate, target_rate) {
        Some(resampler) => resampler.process(input),
        None => input.to_vec(),
    }
}
