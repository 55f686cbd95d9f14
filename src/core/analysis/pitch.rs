// src/core/analysis/pitch.rs
//
// Peak-picking pitch tracker over a magnitude spectrogram. Candidate bins are
// thresholded local maxima inside [fmin, fmax); each candidate is refined by
// parabolic interpolation.

use crate::core::dsp::Spectrogram;

/// Pitch tracking parameters
#[derive(Debug, Clone)]
pub struct PitchParams {
    pub fmin: f32,
    pub fmax: f32,
    /// Fraction of the frame maximum a candidate must exceed
    pub threshold: f32,
}

impl Default for PitchParams {
    fn default() -> Self {
        Self {
            fmin: 150.0,
            fmax: 4000.0,
            threshold: 0.1,
        }
    }
}

/// Interpolated pitch and magnitude of one candidate bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchCandidate {
    pub bin: usize,
    pub frequency: f32,
    pub magnitude: f32,
}

/// All candidates of one frame, ascending by bin
pub fn frame_candidates(
    frame: &[f32],
    sample_rate: u32,
    n_fft: usize,
    params: &PitchParams,
) -> Vec<PitchCandidate> {
    let n = frame.len();
    if n < 3 {
        return Vec::new();
    }

    let frame_max = frame.iter().fold(0.0f32, |a, &b| a.max(b));
    let reference = params.threshold * frame_max;
    let gated = |k: usize| if frame[k] > reference { frame[k] } else { 0.0 };
    let bin_hz = sample_rate as f32 / n_fft as f32;

    let mut out = Vec::new();
    for k in 1..n {
        let freq = k as f32 * bin_hz;
        if freq < params.fmin || freq >= params.fmax {
            continue;
        }
        let here = gated(k);
        let right = if k + 1 < n { gated(k + 1) } else { here };
        if !(here > gated(k - 1) && here >= right) {
            continue;
        }

        // Parabolic refinement; the outermost bins have no neighbours on both sides
        let (shift, skew) = if k + 1 < n {
            let avg = 0.5 * (frame[k + 1] - frame[k - 1]);
            let curvature = 2.0 * frame[k] - frame[k + 1] - frame[k - 1];
            let denom = if curvature.abs() < f32::MIN_POSITIVE { 1.0 } else { curvature };
            let shift = avg / denom;
            (shift, 0.5 * avg * shift)
        } else {
            (0.0, 0.0)
        };

        out.push(PitchCandidate {
            bin: k,
            frequency: (k as f32 + shift) * bin_hz,
            magnitude: frame[k] + skew,
        });
    }
    out
}

/// Dominant pitch per frame: the frequency of the strongest candidate, or
/// 0.0 when the frame has none
pub fn dominant_pitch_track(
    spec: &Spectrogram,
    sample_rate: u32,
    n_fft: usize,
    params: &PitchParams,
) -> Vec<f32> {
    spec.frames
        .iter()
        .map(|frame| {
            let mut best: Option<PitchCandidate> = None;
            for c in frame_candidates(frame, sample_rate, n_fft, params) {
                // Ties keep the lower bin; non-positive magnitudes lose to empty bins
                if c.magnitude > best.map_or(0.0, |b| b.magnitude) {
                    best = Some(c);
                }
            }
            best.map_or(0.0, |c| c.frequency)
        })
        .collect()
}

/// Histogram resolution of the tuning estimate, in fractions of a bin
const TUNING_RESOLUTION: f32 = 0.01;

/// Most common deviation of `frequencies` from an A440 grid with
/// `bins_per_octave` steps, in fractions of a bin within [-0.5, 0.5).
/// Non-positive frequencies are ignored; no usable frequency gives 0.0.
pub fn pitch_tuning(frequencies: &[f32], bins_per_octave: usize) -> f32 {
    let n_hist = (1.0 / TUNING_RESOLUTION).ceil() as usize;
    let mut counts = vec![0usize; n_hist];
    let mut any = false;

    for &f in frequencies.iter().filter(|&&f| f > 0.0) {
        let octs = (f as f64 / (440.0 / 16.0)).log2();
        let mut residual = (bins_per_octave as f64 * octs).rem_euclid(1.0);
        if residual >= 0.5 {
            residual -= 1.0;
        }
        let idx = ((residual + 0.5) / TUNING_RESOLUTION as f64).floor() as usize;
        counts[idx.min(n_hist - 1)] += 1;
        any = true;
    }

    if !any {
        log::debug!("No pitched frames; assuming A440 tuning");
        return 0.0;
    }

    // First of the tallest bins, reported by its lower edge
    let mut best = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = i;
        }
    }
    -0.5 + best as f32 * TUNING_RESOLUTION
}

/// Estimate the tuning offset of a power spectrogram against A440, in
/// fractions of a bin at `bins_per_octave` resolution.
///
/// Every pitch candidate at or above the median candidate magnitude votes.
pub fn estimate_tuning(spec: &Spectrogram, sample_rate: u32, n_fft: usize, bins_per_octave: usize) -> f32 {
    let params = PitchParams::default();
    let candidates: Vec<PitchCandidate> = spec
        .frames
        .iter()
        .flat_map(|frame| frame_candidates(frame, sample_rate, n_fft, &params))
        .filter(|c| c.frequency > 0.0)
        .collect();

    let mut magnitudes: Vec<f32> = candidates.iter().map(|c| c.magnitude).collect();
    magnitudes.sort_by(|a, b| a.total_cmp(b));
    let threshold = match magnitudes.len() {
        0 => 0.0,
        n if n % 2 == 1 => magnitudes[n / 2],
        n => 0.5 * (magnitudes[n / 2 - 1] + magnitudes[n / 2]),
    };

    let selected: Vec<f32> = candidates
        .iter()
        .filter(|c| c.magnitude >= threshold)
        .map(|c| c.frequency)
        .collect();
    pitch_tuning(&selected, bins_per_octave)
}

/// Positive entries of a pitch track
pub fn voiced(track: &[f32]) -> Vec<f32> {
    track.iter().copied().filter(|&p| p > 0.0).collect()
}
