//! The synthesis pipeline: transcription file in, one WAV per line out.
//!
//! Each transcribed line is stripped of boundary markers, split into
//! overlapping diphones, rewritten onto inventory diphones, decoded
//! with the Viterbi search, and overlap-added into a waveform.

pub mod assemble;
pub mod resolver;
pub mod viterbi;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::audio::io::write_wav;
use crate::constants::SAMPLE_RATE;
use crate::inventory::similarity::PhonemeSimilarity;
use crate::inventory::{load_or_prepare, Inventory};
use crate::transcribe;

/// Markers removed from a transcribed line before diphone splitting.
const STRIPPED_MARKERS: [char; 3] = ['|', '#', '?'];

/// Overlapping diphones of a transcribed line: for phonemes
/// `p_0 ... p_m`, the 2-grams `p_0 p_1`, `p_1 p_2`, and so on.
pub fn line_to_diphones(line: &str) -> Vec<String> {
    let phonemes: Vec<char> = line
        .chars()
        .filter(|c| !STRIPPED_MARKERS.contains(c) && !c.is_whitespace())
        .collect();
    phonemes
        .windows(2)
        .map(|pair| pair.iter().collect())
        .collect()
}

/// Synthesise one transcribed line. Returns `None` for lines too short
/// to contain a diphone or whose diphones all fall out of the
/// inventory.
pub fn synthesize_line(
    line: &str,
    inventory: &Inventory,
    similarity: &PhonemeSimilarity,
) -> Result<Option<Vec<f32>>> {
    let requested = line_to_diphones(line);
    if requested.is_empty() {
        return Ok(None);
    }

    let resolved = resolver::resolve_sequence(&requested, inventory);
    if resolved.is_empty() {
        log::warn!("No synthesisable diphones in line {line:?}");
        return Ok(None);
    }
    if resolved.len() < requested.len() {
        log::warn!(
            "Dropped {} of {} diphones in line {line:?}",
            requested.len() - resolved.len(),
            requested.len()
        );
    }

    let path = viterbi::decode(&resolved, inventory, similarity)?;
    log::debug!(
        "Selected {} units, total cost {:.3}",
        path.indices.len(),
        path.total_cost
    );

    let signals = viterbi::path_signals(&resolved, &path, inventory);
    Ok(Some(assemble::assemble(&signals)))
}

/// Transcribe `input` and synthesise one numbered WAV per transcribed
/// line into `output_dir`, preparing the inventory artifacts under
/// `hds_dir` when absent. Returns the written WAV paths.
pub fn synthesize_file(input: &Path, hds_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let (inventory, similarity) = load_or_prepare(hds_dir)?;

    let trans_path = input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join("trans.txt");
    transcribe::transcribe_file(input, Some(&trans_path))?;
    let transcription = std::fs::read_to_string(&trans_path)
        .with_context(|| format!("Failed to read transcription: {}", trans_path.display()))?;

    let mut written = Vec::new();
    for (index, line) in transcription.lines().enumerate() {
        match synthesize_line(line, &inventory, &similarity) {
            Ok(Some(samples)) => {
                let wav_path = output_dir.join(format!("{index:04}.wav"));
                write_wav(&wav_path, &samples, SAMPLE_RATE)?;
                log::info!(
                    "Synthesised line {index}: {} samples -> {}",
                    samples.len(),
                    wav_path.display()
                );
                written.push(wav_path);
            }
            Ok(None) => log::debug!("Skipping line {index}: nothing to synthesise"),
            Err(e) => log::error!("Failed to synthesise line {index}: {e:#}"),
        }
    }
    Ok(written)
}
