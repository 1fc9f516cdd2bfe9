//! WAV read/write via hound.
//!
//! Samples are carried through the pipeline as `f32` in 16-bit PCM
//! scale; the writer clamps back to the i16 range.

use std::path::Path;

use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::constants::SAMPLE_RATE;

/// Read a mono 16 kHz 16-bit PCM WAV file as `f32` samples in int16
/// scale.
pub fn read_wav(path: &Path) -> Result<Vec<f32>> {
    let reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();
    if spec.sample_rate != SAMPLE_RATE {
        bail!(
            "{}: expected {} Hz, got {} Hz",
            path.display(),
            SAMPLE_RATE,
            spec.sample_rate
        );
    }
    if spec.channels != 1 || spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        bail!("{}: expected mono 16-bit PCM", path.display());
    }

    let samples = reader
        .into_samples::<i16>()
        .map(|s| s.map(|v| v as f32))
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read WAV samples: {}", path.display()))?;
    Ok(samples)
}

/// Write int16-scale `f32` samples as a mono 16-bit PCM WAV file,
/// clamping to the i16 range. Creates parent directories if needed.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample.clamp(i16::MIN as f32, i16::MAX as f32) as i16)?;
    }
    writer.finalize().context("Failed to finalize WAV file")?;
    Ok(())
}
