//! Phoneme similarity losses.
//!
//! The source of truth is a three-level partition of the phonetic
//! alphabet: broad articulatory classes, narrow classes, and exact
//! variant pairs. The partitions are expanded at build time into a
//! dense loss table over the whole alphabet; later (finer) levels
//! overwrite earlier ones, and the diagonal is zeroed last.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::transcribe::rules::ALPHABET;

/// Loss per similarity level, broad to fine.
pub const SIMILARITY_LOSS: [f32; 3] = [0.75, 0.5, 0.25];

/// Loss against an absent context phoneme.
pub const MISSING_CONTEXT_LOSS: f32 = 2.0;

/// Loss for unrelated symbol pairs.
pub const UNRELATED_LOSS: f32 = 1.0;

/// Mutually-similar symbol groups, broad to fine. Each string is one
/// partition instance; a pair inside an instance gets that level's
/// loss. Level 2 holds the short/long vowel pairs, the voicing pairs,
/// and the syllabic/devoiced consonant variants.
pub const SIMILARITY_LEVELS: [&[&str]; 3] = [
    &[
        "aeiouAEIOUyYF@",
        "ptTkbdDg",
        "cCwW",
        "fvszSZxhG",
        "mnNJMH",
        "lrLPRQj",
    ],
    &[
        "iIeE@", "aA", "oOuU", "yYF", "ptTk", "bdDg", "cC", "wW", "fsSxG", "vzZh", "mMH", "nNJ",
        "lL", "rPRQ",
    ],
    &[
        "iI", "eE", "aA", "oO", "uU", "pb", "td", "TD", "kg", "fv", "sz", "SZ", "xh", "cw", "CW",
        "RQ", "mH", "lL", "rP",
    ],
];

/// Symmetric loss function over the phonetic alphabet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonemeSimilarity {
    pub(crate) losses: BTreeMap<(char, char), f32>,
    pub(crate) unrelated: f32,
    pub(crate) missing_context: f32,
}

impl PhonemeSimilarity {
    /// Expand the level partitions into the dense loss table.
    pub fn build() -> Self {
        let mut losses = BTreeMap::new();
        for a in ALPHABET.chars() {
            for b in ALPHABET.chars() {
                losses.insert((a, b), UNRELATED_LOSS);
            }
        }
        for (level, groups) in SIMILARITY_LEVELS.iter().enumerate() {
            let loss = SIMILARITY_LOSS[level];
            for group in *groups {
                for a in group.chars() {
                    for b in group.chars() {
                        losses.insert((a, b), loss);
                    }
                }
            }
        }
        for a in ALPHABET.chars() {
            losses.insert((a, a), 0.0);
        }
        PhonemeSimilarity {
            losses,
            unrelated: UNRELATED_LOSS,
            missing_context: MISSING_CONTEXT_LOSS,
        }
    }

    /// Loss between a requested context phoneme and a unit's recorded
    /// context, `None` meaning the unit sits at a sentence edge.
    pub fn loss(&self, a: char, b: Option<char>) -> f32 {
        match b {
            None => self.missing_context,
            Some(b) => *self.losses.get(&(a, b)).unwrap_or(&self.unrelated),
        }
    }

    /// Partition mates of `c`, finest level first, excluding `c`
    /// itself. Used by the fallback diphone resolver.
    pub fn mates(c: char) -> Vec<char> {
        let mut out = Vec::new();
        for groups in SIMILARITY_LEVELS.iter().rev() {
            for group in *groups {
                if group.contains(c) {
                    for p in group.chars() {
                        if p != c && !out.contains(&p) {
                            out.push(p);
                        }
                    }
                }
            }
        }
        out
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = bincode::serialize(self).context("Failed to encode similarity table")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write similarity table: {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read similarity table: {}", path.display()))?;
        bincode::deserialize(&bytes).context("Failed to decode similarity table")
    }
}
