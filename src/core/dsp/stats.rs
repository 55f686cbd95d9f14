//! Statistical helpers and frame-level time-domain measures

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    (data.iter().map(|&x| x as f64).sum::<f64>() / data.len() as f64) as f32
}

/// Population standard deviation (divides by n); 0.0 for an empty slice
pub fn std_dev(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data) as f64;
    let sum_sq: f64 = data.iter().map(|&x| (x as f64 - m).powi(2)).sum();
    ((sum_sq / data.len() as f64) as f32).sqrt()
}

/// Per-frame RMS over centred, zero-padded frames
pub fn frame_rms(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f32> {
    let pad = frame_length / 2;
    let n_frames = 1 + samples.len() / hop_length.max(1);

    (0..n_frames)
        .map(|t| {
            let start = (t * hop_length) as isize - pad as isize;
            let sum_sq: f64 = (0..frame_length)
                .filter_map(|i| {
                    let idx = start + i as isize;
                    (idx >= 0 && (idx as usize) < samples.len()).then(|| samples[idx as usize])
                })
                .map(|s| (s as f64) * (s as f64))
                .sum();
            (sum_sq / frame_length as f64).sqrt() as f32
        })
        .collect()
}

/// Per-frame zero-crossing rate over centred frames with edge padding.
/// Zero counts as positive; values within 1e-10 of zero are treated as zero.
pub fn frame_zero_crossing_rate(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    let pad = frame_length / 2;
    let n_frames = 1 + samples.len() / hop_length.max(1);
    let last = samples.len() - 1;

    let negative = |idx: isize| -> bool {
        let clamped = idx.clamp(0, last as isize) as usize;
        let s = samples[clamped];
        s.abs() > 1e-10 && s < 0.0
    };

    (0..n_frames)
        .map(|t| {
            let start = (t * hop_length) as isize - pad as isize;
            let crossings = (1..frame_length)
                .filter(|&i| {
                    let idx = start + i as isize;
                    negative(idx) != negative(idx - 1)
                })
                .count();
            crossings as f32 / frame_length as f32
        })
        .collect()
}

/// Amplitudes to dB relative to the largest value, floored at `top_db` below it
pub fn amplitude_to_db_relative(values: &[f32], top_db: f32) -> Vec<f32> {
    const AMIN: f32 = 1e-5;
    let peak = values.iter().fold(0.0f32, |a, &b| a.max(b));
    let ref_db = 20.0 * peak.max(AMIN).log10();
    let floor = -top_db;
    values
        .iter()
        .map(|&v| (20.0 * v.max(AMIN).log10() - ref_db).max(floor))
        .collect()
}
