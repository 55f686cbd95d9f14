//! Window function implementations

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowType {
    /// Periodic Hann, for spectral analysis frames
    Hann,
    /// Symmetric Kaiser with the given beta, for FIR design
    Kaiser(f64),
}

/// Create window function
pub fn create_window(size: usize, window_type: WindowType) -> Vec<f64> {
    if size == 0 {
        return Vec::new();
    }
    if size == 1 {
        return vec![1.0];
    }
    match window_type {
        WindowType::Hann => {
            let n = size as f64;
            (0..size)
                .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / n).cos()))
                .collect()
        }
        WindowType::Kaiser(beta) => {
            let alpha = (size - 1) as f64 / 2.0;
            let norm = bessel_i0(beta);
            (0..size)
                .map(|i| {
                    let ratio = (i as f64 - alpha) / alpha;
                    let arg = beta * (1.0 - ratio * ratio).max(0.0).sqrt();
                    bessel_i0(arg) / norm
                })
                .collect()
        }
    }
}

/// Modified Bessel function I0 (for Kaiser window)
fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let x_half = x / 2.0;

    for k in 1..64 {
        term *= (x_half / k as f64).powi(2);
        sum += term;
        if term < 1e-15 * sum {
            break;
        }
    }
    sum
}
