// src/core/wav.rs
//
// WAV property reading and format normalisation over in-memory byte buffers.
// Conversion never loses the caller's audio: on any failure the original
// bytes come back together with the reason.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Cursor;

use super::decoder::DecodedAudio;
use super::dsp::resample;
use crate::error::AudioFormatError;

/// Header-level description of a WAV buffer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioProperties {
    pub channels: u16,
    pub sample_width_bits: u16,
    pub sample_rate: u32,
    /// Samples per channel
    pub frame_count: u32,
    pub duration_secs: f64,
}

impl AudioProperties {
    /// Sample width in bytes
    pub fn sample_width_bytes(&self) -> u16 {
        self.sample_width_bits.div_ceil(8)
    }

    fn from_spec(spec: &WavSpec, frame_count: u32) -> Self {
        let duration_secs = if spec.sample_rate > 0 {
            frame_count as f64 / spec.sample_rate as f64
        } else {
            0.0
        };
        Self {
            channels: spec.channels,
            sample_width_bits: spec.bits_per_sample,
            sample_rate: spec.sample_rate,
            frame_count,
            duration_secs,
        }
    }
}

/// Outcome of [`normalize_audio`]
#[derive(Debug)]
pub enum ConversionStatus {
    /// Output is in the requested format
    Converted,
    /// Output is the untouched input; carries the reason
    Fallback(AudioFormatError),
}

/// Playable bytes plus whether conversion actually happened
#[derive(Debug)]
pub struct NormalizedAudio {
    pub bytes: Vec<u8>,
    pub status: ConversionStatus,
}

impl NormalizedAudio {
    pub fn is_converted(&self) -> bool {
        matches!(self.status, ConversionStatus::Converted)
    }

    pub fn fallback_reason(&self) -> Option<&AudioFormatError> {
        match &self.status {
            ConversionStatus::Converted => None,
            ConversionStatus::Fallback(err) => Some(err),
        }
    }
}

fn open(bytes: &[u8]) -> Result<WavReader<Cursor<&[u8]>>, AudioFormatError> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int {
        return Err(AudioFormatError::UnsupportedSampleFormat);
    }
    if spec.channels == 0 {
        return Err(AudioFormatError::Decode("header declares zero channels".into()));
    }
    Ok(reader)
}

/// Parse the WAV header. Any integer PCM width is reported; float data is rejected.
pub fn read_audio_properties(bytes: &[u8]) -> Result<AudioProperties, AudioFormatError> {
    let reader = open(bytes)?;
    Ok(AudioProperties::from_spec(&reader.spec(), reader.duration()))
}

/// Scale factor mapping a signed integer sample of `bits` width into [-1, 1]
fn sample_scale(bits: u16) -> Result<f32, AudioFormatError> {
    match bits {
        // hound already re-centres unsigned 8-bit samples around zero
        8 => Ok(128.0),
        16 => Ok(32768.0),
        32 => Ok(2147483648.0),
        other => Err(AudioFormatError::UnsupportedSampleWidth(other)),
    }
}

/// Decode 8, 16 or 32-bit integer PCM into interleaved floats
pub fn decode_wav(bytes: &[u8]) -> Result<(AudioProperties, DecodedAudio), AudioFormatError> {
    let mut reader = open(bytes)?;
    let spec = reader.spec();
    let scale = sample_scale(spec.bits_per_sample)?;
    let props = AudioProperties::from_spec(&spec, reader.duration());

    let samples = reader
        .samples::<i32>()
        .map(|s| s.map(|v| v as f32 / scale))
        .collect::<Result<Vec<f32>, _>>()?;

    log::debug!(
        "Decoded WAV: {} ch, {} bit, {} Hz, {} frames",
        props.channels,
        props.sample_width_bits,
        props.sample_rate,
        props.frame_count
    );

    let audio = DecodedAudio::new(samples, spec.sample_rate, spec.channels as usize);
    Ok((props, audio))
}

/// Float to 16-bit PCM with hard clipping
fn quantize_i16(x: f32) -> i16 {
    (x * 32768.0).round().clamp(-32768.0, 32767.0) as i16
}

/// Encode per-channel buffers as 16-bit PCM WAV
pub fn encode_wav_i16(channels: &[Vec<f32>], sample_rate: u32) -> Result<Vec<u8>, AudioFormatError> {
    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| AudioFormatError::Encode(e.to_string()))?;
        for i in 0..frames {
            for channel in channels {
                writer
                    .write_sample(quantize_i16(channel[i]))
                    .map_err(|e| AudioFormatError::Encode(e.to_string()))?;
            }
        }
        writer
            .finalize()
            .map_err(|e| AudioFormatError::Encode(e.to_string()))?;
    }
    Ok(cursor.into_inner())
}

/// Per-frame arithmetic mean across channels
fn downmix(channels: &[Vec<f32>]) -> Vec<f32> {
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    let n = channels.len().max(1) as f32;
    (0..frames)
        .map(|i| channels.iter().map(|c| c[i]).sum::<f32>() / n)
        .collect()
}

/// Strict conversion: decode, resample, downmix, requantise, re-encode
pub fn try_convert(
    bytes: &[u8],
    target_channels: u16,
    target_rate: u32,
) -> Result<Vec<u8>, AudioFormatError> {
    if target_channels == 0 {
        return Err(AudioFormatError::InvalidTarget("channel count must be positive".into()));
    }
    if target_rate == 0 {
        return Err(AudioFormatError::InvalidTarget("sample rate must be positive".into()));
    }

    let (props, audio) = decode_wav(bytes)?;
    if props.channels != target_channels && target_channels != 1 {
        return Err(AudioFormatError::UnsupportedChannelConversion {
            from: props.channels,
            to: target_channels,
        });
    }

    let mut channels = audio.deinterleave();

    if props.sample_rate != target_rate {
        log::info!(
            "Resampling {} channel(s) {} Hz -> {} Hz",
            channels.len(),
            props.sample_rate,
            target_rate
        );
        let source_rate = props.sample_rate;
        channels = channels
            .par_iter()
            .map(|c| resample(c, source_rate, target_rate))
            .collect();
    }

    if props.channels != target_channels {
        log::info!("Downmixing {} channels to mono", props.channels);
        channels = vec![downmix(&channels)];
    }

    encode_wav_i16(&channels, target_rate)
}

/// Convert to `target_channels` / `target_rate` 16-bit PCM, falling back to
/// the original bytes on any failure
pub fn normalize_audio(bytes: &[u8], target_channels: u16, target_rate: u32) -> NormalizedAudio {
    match try_convert(bytes, target_channels, target_rate) {
        Ok(converted) => NormalizedAudio {
            bytes: converted,
            status: ConversionStatus::Converted,
        },
        Err(err) => {
            log::warn!("Conversion failed, returning original audio: {}", err);
            NormalizedAudio {
                bytes: bytes.to_vec(),
                status: ConversionStatus::Fallback(err),
            }
        }
    }
}
