//! Pitch-mark track reader.
//!
//! One pitch mark per non-empty line: `<time_sec> <time_sec> <type>`
//! with type in {V, U, T} and an optional leading space.

use std::path::Path;

use crate::error::SynthesisError;
use crate::types::{PitchMark, PitchMarkKind};

fn parse_kind(token: &str, path: &Path, line_no: usize) -> Result<PitchMarkKind, SynthesisError> {
    match token {
        "V" => Ok(PitchMarkKind::Voiced),
        "U" => Ok(PitchMarkKind::Unvoiced),
        "T" => Ok(PitchMarkKind::Transitional),
        other => Err(SynthesisError::format(
            path,
            line_no,
            format!("unknown pitch-mark type {other:?}"),
        )),
    }
}

/// Read every pitch mark in the file, in file order.
pub fn read_pitch_marks(path: &Path) -> Result<Vec<PitchMark>, SynthesisError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SynthesisError::MissingFile(path.to_path_buf()),
        _ => SynthesisError::format(path, 0, e.to_string()),
    })?;

    let mut marks = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;
        let mut fields = line.split_whitespace();
        let Some(time_field) = fields.next() else {
            continue; // blank line
        };
        let time: f64 = time_field.parse().map_err(|_| {
            SynthesisError::format(path, line_no, format!("bad time field {time_field:?}"))
        })?;
        let kind_field = fields.last().ok_or_else(|| {
            SynthesisError::format(path, line_no, "missing pitch-mark type column")
        })?;
        let kind = parse_kind(kind_field, path, line_no)?;
        marks.push(PitchMark { time, kind });
    }
    Ok(marks)
}

/// Read the pitch marks usable for unit cutting: transitional marks are
/// dropped.
pub fn read_cutting_pitch_marks(path: &Path) -> Result<Vec<PitchMark>, SynthesisError> {
    let marks = read_pitch_marks(path)?;
    Ok(marks
        .into_iter()
        .filter(|pm| pm.kind != PitchMarkKind::Transitional)
        .collect())
}

/// The pitch mark with the smallest time strictly greater than `t`.
/// Fails with `BoundaryOutOfRange` when every mark is at or before `t`;
/// callers cutting units recover by clamping to the final mark.
pub fn nearest_after(marks: &[PitchMark], t: f64) -> Result<&PitchMark, SynthesisError> {
    let i = marks.partition_point(|pm| pm.time <= t);
    marks.get(i).ok_or(SynthesisError::BoundaryOutOfRange(t))
}

/// `nearest_after` with the clamping recovery applied.
pub fn nearest_or_last(marks: &[PitchMark], t: f64) -> Result<f64, SynthesisError> {
    match nearest_after(marks, t) {
        Ok(pm) => Ok(pm.time),
        Err(_) => marks
            .last()
            .map(|pm| pm.time)
            .ok_or(SynthesisError::BoundaryOutOfRange(t)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_pm(content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("hlaska_pm_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("t_{}.pm", content.len()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_pitch_marks_basic() {
        let path = write_pm(" 0.010 0.010 V\n0.020 0.020 U\n 0.030 0.030 T\n");
        let pms = read_pitch_marks(&path).unwrap();
        assert_eq!(pms.len(), 3);
        assert!((pms[0].time - 0.010).abs() < 1e-12);
        assert_eq!(pms[0].kind, PitchMarkKind::Voiced);
        assert_eq!(pms[2].kind, PitchMarkKind::Transitional);
    }

    #[test]
    fn test_read_cutting_drops_transitional() {
        let path = write_pm("0.010 0.010 V\n0.020 0.020 T\n0.030 0.030 U\n");
        let pms = read_cutting_pitch_marks(&path).unwrap();
        assert_eq!(pms.len(), 2);
        assert!(pms.iter().all(|pm| pm.kind != PitchMarkKind::Transitional));
    }

    #[test]
    fn test_read_pitch_marks_bad_time() {
        let path = write_pm("abc 0.010 V\n");
        let err = read_pitch_marks(&path).unwrap_err();
        assert!(matches!(err, SynthesisError::InputFormat { line: 1, .. }));
    }

    #[test]
    fn test_read_pitch_marks_missing_file() {
        let err = read_pitch_marks(Path::new("/nonexistent/x.pm")).unwrap_err();
        assert!(matches!(err, SynthesisError::MissingFile(_)));
    }

    #[test]
    fn test_nearest_after_is_right_successor() {
        let pms: Vec<PitchMark> = [0.01, 0.02, 0.03]
            .iter()
            .map(|&time| PitchMark { time, kind: PitchMarkKind::Voiced })
            .collect();
        assert!((nearest_after(&pms, 0.015).unwrap().time - 0.02).abs() < 1e-12);
        // Exact hit returns the successor, not the mark itself
        assert!((nearest_after(&pms, 0.02).unwrap().time - 0.03).abs() < 1e-12);
        assert!(nearest_after(&pms, 0.03).is_err());
    }

    #[test]
    fn test_nearest_or_last_clamps() {
        let pms: Vec<PitchMark> = [0.01, 0.02]
            .iter()
            .map(|&time| PitchMark { time, kind: PitchMarkKind::Unvoiced })
            .collect();
        assert!((nearest_or_last(&pms, 1.0).unwrap() - 0.02).abs() < 1e-12);
        assert!(nearest_or_last(&[], 1.0).is_err());
    }
}
