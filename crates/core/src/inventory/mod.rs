//! Diphone inventory: offline builder and persisted artifacts.
//!
//! For every training sentence the builder reads the waveform, pitch
//! marks, phoneme alignment, and feature tracks, cuts pitch-synchronous
//! diphone fragments, fades their edges, and stores them keyed by
//! diphone with the target/concatenation features the decoder needs.
//! Sentences are independent, so the build fans out with rayon; the
//! per-sentence partial unit lists are merged in sorted sentence order
//! to keep the artifact deterministic.

pub mod similarity;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::audio::io::{read_wav, write_wav};
use crate::audio::window::{apply_fade, FADE_WINDOW};
use crate::constants::{
    BUILD_INFO_FILE, INVENTORY_FILE, MASTER_MLF, MIN_LENGTH, MLF_DIR, PM_DIR, PREP_DIR,
    SAMPLE_RATE, SAMPLE_TIME, SIMILARITY_FILE, SPC_DIR,
};
use crate::corpus::alignment::{read_alignment, split_master_alignment};
use crate::corpus::features::SentenceFeatures;
use crate::corpus::pitch_marks::read_cutting_pitch_marks;
use crate::error::SynthesisError;
use crate::types::SpeechUnit;
use similarity::PhonemeSimilarity;

/// Mapping from a two-symbol diphone key to its recorded units.
/// Built once, read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    units: BTreeMap<String, Vec<SpeechUnit>>,
}

/// Summary of a finished inventory build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryStats {
    pub diphones: usize,
    pub units: usize,
    pub min_unit_secs: f64,
    pub max_unit_secs: f64,
    pub mean_unit_secs: f64,
}

impl Inventory {
    pub fn contains(&self, diphone: &str) -> bool {
        self.units.contains_key(diphone)
    }

    pub fn get(&self, diphone: &str) -> Option<&[SpeechUnit]> {
        self.units.get(diphone).map(Vec::as_slice)
    }

    pub fn insert(&mut self, diphone: String, unit: SpeechUnit) {
        self.units.entry(diphone).or_default().push(unit);
    }

    pub fn diphone_count(&self) -> usize {
        self.units.len()
    }

    pub fn unit_count(&self) -> usize {
        self.units.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit-length distribution over the whole inventory.
    pub fn stats(&self) -> InventoryStats {
        let mut min = f64::INFINITY;
        let mut max: f64 = 0.0;
        let mut total = 0.0;
        let mut n = 0usize;
        for unit in self.units.values().flatten() {
            let secs = unit.duration();
            min = min.min(secs);
            max = max.max(secs);
            total += secs;
            n += 1;
        }
        InventoryStats {
            diphones: self.units.len(),
            units: n,
            min_unit_secs: if n == 0 { 0.0 } else { min },
            max_unit_secs: max,
            mean_unit_secs: if n == 0 { 0.0 } else { total / n as f64 },
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = bincode::serialize(self).context("Failed to encode inventory")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write inventory: {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read inventory: {}", path.display()))?;
        bincode::deserialize(&bytes).context("Failed to decode inventory")
    }

    /// Dump every unit as a WAV under `<out_dir>/signals/<diphone>_<n>/`
    /// for listening and inspection.
    pub fn export_unit_wavs(&self, out_dir: &Path) -> Result<usize> {
        let mut written = 0usize;
        for (n, (diphone, units)) in self.units.iter().enumerate() {
            let dir = out_dir.join("signals").join(format!("{}_{}", diphone, n + 1));
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            for (j, unit) in units.iter().enumerate() {
                write_wav(&dir.join(format!("{j}.wav")), &unit.signal, SAMPLE_RATE)?;
                written += 1;
            }
        }
        Ok(written)
    }
}

/// Paths of the persisted build artifacts under `<hds_dir>/prep/`.
pub fn artifact_paths(hds_dir: &Path) -> (PathBuf, PathBuf) {
    let prep = hds_dir.join(PREP_DIR);
    (prep.join(INVENTORY_FILE), prep.join(SIMILARITY_FILE))
}

fn list_mlf_stems(mlf_dir: &Path) -> Result<Vec<String>> {
    let mut stems: Vec<String> = std::fs::read_dir(mlf_dir)
        .with_context(|| format!("Failed to list {}", mlf_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|e| e == "mlf"))
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    stems.sort();
    Ok(stems)
}

/// Sentence stems found in `<hds_dir>/mlf/`, sorted by name. Splits the
/// master alignment file first when the per-sentence files are absent.
fn sentence_stems(hds_dir: &Path) -> Result<Vec<String>> {
    let mlf_dir = hds_dir.join(MLF_DIR);
    let master = hds_dir.join(MASTER_MLF);

    if !mlf_dir.is_dir() && !master.is_file() {
        return Err(SynthesisError::MissingDirectory(mlf_dir).into());
    }

    let mut stems = if mlf_dir.is_dir() {
        list_mlf_stems(&mlf_dir)?
    } else {
        Vec::new()
    };
    if stems.is_empty() && master.is_file() {
        if split_master_alignment(hds_dir, &master)? == 0 {
            anyhow::bail!("No sentences in {}", master.display());
        }
        stems = list_mlf_stems(&mlf_dir)?;
    }
    Ok(stems)
}

/// Cut, fade, and annotate the units of one training sentence.
fn sentence_units(hds_dir: &Path, stem: &str) -> Result<Vec<(String, SpeechUnit)>> {
    let signal = read_wav(&hds_dir.join(SPC_DIR).join(format!("{stem}.wav")))?;
    let marks = read_cutting_pitch_marks(&hds_dir.join(PM_DIR).join(format!("{stem}.pm")))?;
    let segments = read_alignment(&hds_dir.join(MLF_DIR).join(format!("{stem}.mlf")), &marks)?;
    let features = SentenceFeatures::load(hds_dir, stem)?;

    let mut out = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        let start_i = (segment.start / SAMPLE_TIME).round() as usize;
        let stop_i = ((segment.end / SAMPLE_TIME).round() as usize).min(signal.len());
        if start_i >= stop_i {
            continue;
        }

        let mut cut = signal[start_i..stop_i].to_vec();
        if cut.len() <= MIN_LENGTH {
            log::debug!("{stem}: skipping short unit {} ({} samples)", segment.diphone, cut.len());
            continue;
        }
        apply_fade(&mut cut, &FADE_WINDOW);

        let unit = SpeechUnit {
            signal: cut,
            left_phoneme: i
                .checked_sub(1)
                .and_then(|j| segments[j].diphone.chars().next()),
            right_phoneme: segments.get(i + 1).and_then(|s| s.diphone.chars().nth(1)),
            sentence_position: i as f32 / segments.len() as f32,
            enrg_start: features.energy.scalar_at(segment.start)?,
            enrg_stop: features.energy.scalar_at(segment.end)?,
            f0_start: features.f0.scalar_at(segment.start)?,
            f0_stop: features.f0.scalar_at(segment.end)?,
            mfcc_start: features.mfcc.at(segment.start)?.to_vec(),
            mfcc_stop: features.mfcc.at(segment.end)?.to_vec(),
        };
        out.push((segment.diphone.clone(), unit));
    }
    Ok(out)
}

/// Build the inventory from every sentence under `hds_dir`.
///
/// Sentences failing to read are skipped with a warning; the build only
/// fails when the corpus directories are missing or no sentence
/// yields units.
pub fn build_inventory(hds_dir: &Path) -> Result<Inventory> {
    let stems = sentence_stems(hds_dir)?;
    log::info!("Building inventory from {} sentences", stems.len());

    let partials: Vec<Vec<(String, SpeechUnit)>> = stems
        .par_iter()
        .filter_map(|stem| match sentence_units(hds_dir, stem) {
            Ok(units) => Some(units),
            Err(e) => {
                log::warn!("Skipping sentence {stem}: {e:#}");
                None
            }
        })
        .collect();

    let mut inventory = Inventory::default();
    for sentence in partials {
        for (diphone, unit) in sentence {
            inventory.insert(diphone, unit);
        }
    }

    if inventory.is_empty() {
        anyhow::bail!("No usable units in corpus at {}", hds_dir.display());
    }

    let stats = inventory.stats();
    log::info!(
        "Inventory: {} diphones, {} units, unit length {:.3}-{:.3}s (mean {:.3}s)",
        stats.diphones,
        stats.units,
        stats.min_unit_secs,
        stats.max_unit_secs,
        stats.mean_unit_secs
    );
    Ok(inventory)
}

/// Build and persist the inventory and similarity artifacts plus a
/// JSON build summary. Returns the loaded structures.
pub fn prepare_artifacts(hds_dir: &Path) -> Result<(Inventory, PhonemeSimilarity)> {
    let (inv_path, sim_path) = artifact_paths(hds_dir);

    let inventory = build_inventory(hds_dir)?;
    inventory.save(&inv_path)?;

    let similarity = PhonemeSimilarity::build();
    similarity.save(&sim_path)?;

    let info_path = hds_dir.join(PREP_DIR).join(BUILD_INFO_FILE);
    let info = serde_json::to_string_pretty(&inventory.stats())?;
    std::fs::write(&info_path, info)
        .with_context(|| format!("Failed to write {}", info_path.display()))?;

    log::info!("Wrote {} and {}", inv_path.display(), sim_path.display());
    Ok((inventory, similarity))
}

/// Load the persisted artifacts, building them first when either is
/// missing.
pub fn load_or_prepare(hds_dir: &Path) -> Result<(Inventory, PhonemeSimilarity)> {
    let (inv_path, sim_path) = artifact_paths(hds_dir);
    if inv_path.is_file() && sim_path.is_file() {
        log::info!("Loading inventory artifacts from {}", hds_dir.join(PREP_DIR).display());
        Ok((Inventory::load(&inv_path)?, PhonemeSimilarity::load(&sim_path)?))
    } else {
        prepare_artifacts(hds_dir)
    }
}
