//! Prosodic feature track reader.
//!
//! Energy, F0, and MFCC tracks are plain text with pipe-delimited data
//! rows: `| time | v_1 | ... | v_K |`. The energy and F0 tracks carry a
//! single value column; the MFCC track carries K columns, with K read
//! from the file rather than assumed.

use std::path::{Path, PathBuf};

use crate::constants::FEATS_DIR;
use crate::error::SynthesisError;

/// A time-indexed sequence of feature vectors, ordered by time.
#[derive(Debug, Clone, Default)]
pub struct FeatureTrack {
    rows: Vec<(f64, Vec<f32>)>,
}

impl FeatureTrack {
    /// Parse a pipe-delimited track file. Lines not starting with `|`
    /// are ignored.
    pub fn read(path: &Path) -> Result<Self, SynthesisError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SynthesisError::MissingFile(path.to_path_buf()),
            _ => SynthesisError::format(path, 0, e.to_string()),
        })?;

        let mut rows = Vec::new();
        for (i, line) in content.lines().enumerate() {
            let line_no = i + 1;
            if !line.trim_start().starts_with('|') {
                continue;
            }
            let mut columns = line
                .split('|')
                .map(str::trim)
                .filter(|c| !c.is_empty());

            let time_field = columns.next().ok_or_else(|| {
                SynthesisError::format(path, line_no, "empty feature row")
            })?;
            let time: f64 = time_field.parse().map_err(|_| {
                SynthesisError::format(path, line_no, format!("bad time field {time_field:?}"))
            })?;

            let values = columns
                .map(|c| {
                    c.parse::<f32>().map_err(|_| {
                        SynthesisError::format(path, line_no, format!("bad value field {c:?}"))
                    })
                })
                .collect::<Result<Vec<f32>, _>>()?;
            if values.is_empty() {
                return Err(SynthesisError::format(path, line_no, "missing value column"));
            }
            rows.push((time, values));
        }
        Ok(FeatureTrack { rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Vector dimension K, read from the first row.
    pub fn dim(&self) -> usize {
        self.rows.first().map(|(_, v)| v.len()).unwrap_or(0)
    }

    /// The feature vector at the smallest row time strictly greater
    /// than `t`, clamped to the final row past the end of the track.
    pub fn at(&self, t: f64) -> Result<&[f32], SynthesisError> {
        let i = self.rows.partition_point(|(time, _)| *time <= t);
        let row = self
            .rows
            .get(i)
            .or_else(|| self.rows.last())
            .ok_or(SynthesisError::BoundaryOutOfRange(t))?;
        Ok(&row.1)
    }

    /// Scalar lookup for single-column tracks.
    pub fn scalar_at(&self, t: f64) -> Result<f32, SynthesisError> {
        Ok(self.at(t)?[0])
    }
}

/// The three feature tracks of one training sentence.
#[derive(Debug, Clone)]
pub struct SentenceFeatures {
    pub energy: FeatureTrack,
    pub f0: FeatureTrack,
    pub mfcc: FeatureTrack,
}

impl SentenceFeatures {
    /// Track file path for a sentence stem and extension.
    pub fn track_path(hds_dir: &Path, stem: &str, extension: &str) -> PathBuf {
        hds_dir.join(FEATS_DIR).join(format!("{stem}.{extension}"))
    }

    /// Load `unsel-feats/<stem>.{enrg,f0,mfcc}` for one sentence.
    pub fn load(hds_dir: &Path, stem: &str) -> Result<Self, SynthesisError> {
        Ok(SentenceFeatures {
            energy: FeatureTrack::read(&Self::track_path(hds_dir, stem, "enrg"))?,
            f0: FeatureTrack::read(&Self::track_path(hds_dir, stem, "f0"))?,
            mfcc: FeatureTrack::read(&Self::track_path(hds_dir, stem, "mfcc"))?,
        })
    }
}
