//! Canonical-format audio normalization
//!
//! The speech tiers expect 16 kHz mono 16-bit WAV. Input already in that
//! format passes through untouched; anything else is downmixed, resampled
//! and rewritten once before transcription. Normalization failure is fatal
//! to the run.

use crate::error::{AppError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};

const BITS_PER_SAMPLE: u16 = 16;

/// Whether the file is already in the canonical format.
pub fn is_canonical(path: &Path, sample_rate: u32) -> Result<bool> {
    let reader = WavReader::open(path)
        .map_err(|e| AppError::Acquisition(format!("Failed to open WAV file: {}", e)))?;
    let spec = reader.spec();
    Ok(spec.channels == 1
        && spec.sample_rate == sample_rate
        && spec.bits_per_sample == BITS_PER_SAMPLE
        && spec.sample_format == SampleFormat::Int)
}

/// Normalize an audio file to canonical 16-bit mono WAV at the target rate.
///
/// Returns the input path unchanged when it is already canonical; otherwise
/// writes `<stem>_norm.wav` next to the input and returns that path.
pub fn normalize(path: &Path, sample_rate: u32) -> Result<PathBuf> {
    if is_canonical(path, sample_rate)? {
        log::debug!("Audio already canonical: {}", path.display());
        return Ok(path.to_path_buf());
    }

    let mut reader = WavReader::open(path)
        .map_err(|e| AppError::Acquisition(format!("Failed to open WAV file: {}", e)))?;
    let spec = reader.spec();

    let raw_samples: Vec<i16> = match spec.sample_format {
        SampleFormat::Int => reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Acquisition(format!("Failed to read WAV samples: {}", e)))?,
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| {
                s.map(|sample| {
                    let clamped = sample.max(-1.0).min(1.0);
                    (clamped * 32768.0) as i16
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Acquisition(format!("Failed to read WAV samples: {}", e)))?,
    };

    let mono = downmix(&raw_samples, spec.channels);
    let resampled = if spec.sample_rate != sample_rate {
        resample(&mono, spec.sample_rate, sample_rate)
    } else {
        mono
    };

    let output_path = normalized_path(path);
    let out_spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(&output_path, out_spec)
        .map_err(|e| AppError::Acquisition(format!("Failed to create WAV file: {}", e)))?;
    for sample in resampled {
        writer
            .write_sample(sample)
            .map_err(|e| AppError::Acquisition(format!("Failed to write sample: {}", e)))?;
    }
    writer
        .finalize()
        .map_err(|e| AppError::Acquisition(format!("Failed to finalize WAV file: {}", e)))?;

    log::info!(
        "Normalized {} -> {} ({} Hz mono)",
        path.display(),
        output_path.display(),
        sample_rate
    );

    Ok(output_path)
}

fn normalized_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    path.with_file_name(format!("{}_norm.wav", stem))
}

/// Average interleaved channels down to mono.
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[samples.len() - 1]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}
