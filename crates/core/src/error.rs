//! Structured errors shared by the corpus readers and the decoder.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthesisError {
    /// A corpus file did not match its expected schema.
    #[error("{}:{line}: {message}", .path.display())]
    InputFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("missing file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("missing directory: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// A diphone survived fallback resolution but has no inventory units.
    #[error("no inventory alternatives for diphone \"{0}\"")]
    EmptyAlternatives(String),

    /// A time-keyed lookup ran past the end of its track.
    #[error("lookup past the end of the track (t = {0})")]
    BoundaryOutOfRange(f64),
}

impl SynthesisError {
    pub(crate) fn format(path: &std::path::Path, line: usize, message: impl Into<String>) -> Self {
        SynthesisError::InputFormat {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_format_display() {
        let e = SynthesisError::format(std::path::Path::new("pm/S1.pm"), 3, "bad float");
        assert_eq!(e.to_string(), "pm/S1.pm:3: bad float");
    }

    #[test]
    fn test_empty_alternatives_display() {
        let e = SynthesisError::EmptyAlternatives("ab".to_string());
        assert!(e.to_string().contains("\"ab\""));
    }
}
