// tests/test_utils/mod.rs
//
// Shared helpers for the integration tests: synthetic WAV generation and
// throwaway dataset directories.

#![allow(dead_code)]

use hound::{SampleFormat, WavSpec, WavWriter};
use std::f32::consts::PI;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Mono sine at `amplitude`
pub fn sine(freq: f32, sample_rate: u32, secs: f32, amplitude: f32) -> Vec<f32> {
    let n = (sample_rate as f32 * secs).round() as usize;
    (0..n)
        .map(|i| amplitude * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Interleave equal-length channel buffers
pub fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * channels.len());
    for i in 0..frames {
        for channel in channels {
            out.push(channel[i]);
        }
    }
    out
}

/// Encode interleaved floats as integer PCM of `bits` width
pub fn wav_bytes(interleaved: &[f32], channels: u16, sample_rate: u32, bits: u16) -> Vec<u8> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: bits,
        sample_format: SampleFormat::Int,
    };
    let max = ((1i64 << (bits - 1)) - 1) as f64;
    let min = -((1i64 << (bits - 1)) as f64);

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).expect("wav writer");
        for &x in interleaved {
            let v = (x as f64 * (max + 1.0)).round().clamp(min, max) as i32;
            writer.write_sample(v).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// 16-bit mono sine as WAV bytes
pub fn sine_wav(freq: f32, sample_rate: u32, secs: f32) -> Vec<u8> {
    wav_bytes(&sine(freq, sample_rate, secs, 0.5), 1, sample_rate, 16)
}

/// Voiced-like test tone: fundamental plus two harmonics
pub fn harmonic_tone(f0: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
    let a = sine(f0, sample_rate, secs, 0.4);
    let b = sine(2.0 * f0, sample_rate, secs, 0.2);
    let c = sine(3.0 * f0, sample_rate, secs, 0.1);
    a.iter().zip(&b).zip(&c).map(|((x, y), z)| x + y + z).collect()
}

/// Decode WAV bytes back to interleaved i32 samples and the header
pub fn read_samples(bytes: &[u8]) -> (WavSpec, Vec<i32>) {
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).expect("wav reader");
    let spec = reader.spec();
    let samples = reader.samples::<i32>().collect::<Result<Vec<_>, _>>().expect("samples");
    (spec, samples)
}

/// Dataset filename from its variable fields; modality and channel fixed at 03-01
pub fn dataset_name(emotion: &str, intensity: &str, statement: &str, repetition: &str, actor: u32) -> String {
    format!("03-01-{}-{}-{}-{}-{:02}.wav", emotion, intensity, statement, repetition, actor)
}

/// Temporary dataset root laid out in per-actor folders
pub struct TestDataset {
    pub dir: TempDir,
}

impl TestDataset {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `bytes` as `Actor_NN/<filename>` (or at the root when `actor` is None)
    pub fn add_bytes(&self, actor: Option<u32>, filename: &str, bytes: &[u8]) -> PathBuf {
        let folder = match actor {
            Some(a) => self.root().join(format!("Actor_{:02}", a)),
            None => self.root().to_path_buf(),
        };
        fs::create_dir_all(&folder).expect("create actor folder");
        let path = folder.join(filename);
        fs::write(&path, bytes).expect("write file");
        path
    }

    /// Add a short voiced recording under the conventional name
    pub fn add_recording(&self, emotion: &str, intensity: &str, statement: &str, actor: u32, f0: f32) -> PathBuf {
        let name = dataset_name(emotion, intensity, statement, "01", actor);
        let tone = harmonic_tone(f0, 16000, 0.5);
        self.add_bytes(Some(actor), &name, &wav_bytes(&tone, 1, 16000, 16))
    }
}
