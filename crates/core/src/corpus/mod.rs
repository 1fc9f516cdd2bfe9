//! Readers for the training-corpus file formats: pitch-mark tracks,
//! phoneme alignments, and prosodic feature tracks.

pub mod alignment;
pub mod features;
pub mod pitch_marks;
