//! Digital Signal Processing utilities

pub mod fft;
pub mod filters;
pub mod resample;
pub mod stats;
pub mod windows;

pub use fft::{fft_frequencies, Spectrogram, StftProcessor};
pub use filters::{chroma_filterbank, dct_matrix, mel_filterbank, power_to_db, FilterBank};
pub use resample::{resample, PolyphaseResampler};
pub use windows::{create_window, WindowType};
