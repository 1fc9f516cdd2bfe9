//! Phoneme alignment reader and the master-alignment splitter.
//!
//! Per-sentence alignment files carry one phoneme per line as
//! `<start_ticks> <end_ticks> <label>` in 100 ns ticks. Consecutive
//! phonemes form diphone cut regions spanning phoneme centre to phoneme
//! centre, with each centre snapped to the next pitch mark so the cuts
//! are pitch-synchronous.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::constants::{FADE_TIME, MLF_DIR, TIME_STEP};
use crate::corpus::pitch_marks::nearest_or_last;
use crate::error::SynthesisError;
use crate::types::{DiphoneSegment, PitchMark};

struct AlignedPhoneme {
    label: char,
    center: f64,
}

fn parse_line(
    line: &str,
    path: &Path,
    line_no: usize,
) -> Result<AlignedPhoneme, SynthesisError> {
    let mut fields = line.split_whitespace();
    let mut tick = |name: &str| -> Result<f64, SynthesisError> {
        let field = fields
            .next()
            .ok_or_else(|| SynthesisError::format(path, line_no, format!("missing {name}")))?;
        let ticks: i64 = field.parse().map_err(|_| {
            SynthesisError::format(path, line_no, format!("bad {name} field {field:?}"))
        })?;
        Ok(ticks as f64 * TIME_STEP)
    };
    let start = tick("start ticks")?;
    let stop = tick("end ticks")?;

    let label_field = fields
        .next()
        .ok_or_else(|| SynthesisError::format(path, line_no, "missing phoneme label"))?;
    let mut chars = label_field.chars();
    let label = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(SynthesisError::format(
                path,
                line_no,
                format!("label {label_field:?} is not a single symbol"),
            ))
        }
    };

    Ok(AlignedPhoneme { label, center: (start + stop) / 2.0 })
}

/// Read one sentence's alignment and emit its diphone cut regions.
///
/// The first line is a sentinel: it seeds the previous phoneme as `$`
/// with centre 0. Every later line extends the diphone list with the
/// span from the previous centre (pulled back by half a fade, floored
/// at zero) to this phoneme's pitch-mark-snapped centre.
pub fn read_alignment(
    path: &Path,
    pitch_marks: &[PitchMark],
) -> Result<Vec<DiphoneSegment>, SynthesisError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SynthesisError::MissingFile(path.to_path_buf()),
        _ => SynthesisError::format(path, 0, e.to_string()),
    })?;

    let mut segments = Vec::new();
    let mut last_label = '$';
    let mut last_center = 0.0_f64;
    let mut first_line = true;

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if first_line {
            first_line = false;
            continue;
        }

        let phoneme = parse_line(line, path, i + 1)?;
        let center = nearest_or_last(pitch_marks, phoneme.center)?;

        let start = (last_center - FADE_TIME / 2.0).max(0.0);
        segments.push(DiphoneSegment {
            diphone: format!("{}{}", last_label, phoneme.label),
            start,
            end: center,
        });

        last_center = center;
        last_label = phoneme.label;
    }

    Ok(segments)
}

fn is_sentence_header(line: &str) -> bool {
    line.starts_with("\"*/Sentence")
}

fn is_data_line(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Split a monolithic HTK alignment file into per-sentence files under
/// `<root>/mlf/`. Returns the number of sentence files written.
pub fn split_master_alignment(root: &Path, master: &Path) -> Result<usize> {
    let content = std::fs::read_to_string(master)
        .with_context(|| format!("Failed to read master alignment: {}", master.display()))?;

    let mlf_dir = root.join(MLF_DIR);
    std::fs::create_dir_all(&mlf_dir)
        .with_context(|| format!("Failed to create directory: {}", mlf_dir.display()))?;

    let mut current: Option<std::fs::File> = None;
    let mut count = 0usize;

    for line in content.lines() {
        if is_sentence_header(line) {
            // `"*/Sentence00001.lab"` -> `Sentence00001.mlf`
            let name: String = line.chars().skip(3).take(13).collect();
            let path = mlf_dir.join(format!("{name}.mlf"));
            current = Some(
                std::fs::File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            );
            count += 1;
        } else if is_data_line(line) {
            if let Some(f) = current.as_mut() {
                writeln!(f, "{line}")?;
            }
        }
    }

    log::info!("Split {} into {} sentence alignments", master.display(), count);
    Ok(count)
}
