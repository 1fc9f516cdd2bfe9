use serde::{Deserialize, Serialize};

/// Kind of a pitch mark in the corpus pitch-mark tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchMarkKind {
    /// Glottal closure in a voiced region.
    Voiced,
    /// Placement impulse in an unvoiced region.
    Unvoiced,
    /// Transitional point between regions; ignored for unit cutting.
    Transitional,
}

/// A single pitch mark: an instant in the source waveform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchMark {
    /// Time in seconds from sentence start
    pub time: f64,
    pub kind: PitchMarkKind,
}

/// One diphone cut region produced from a sentence alignment: the span
/// from the previous phoneme's centre to this phoneme's centre, both
/// snapped to pitch marks.
#[derive(Debug, Clone, PartialEq)]
pub struct DiphoneSegment {
    /// Two-symbol diphone key
    pub diphone: String,
    /// Cut start in seconds
    pub start: f64,
    /// Cut end in seconds
    pub end: f64,
}

/// One recorded diphone instance with its selection features.
///
/// The signal is raw 16-bit-scale PCM as `f32`, with the Hanning fade
/// half-windows already multiplied into both edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechUnit {
    pub signal: Vec<f32>,

    // Target-cost features
    /// First symbol of the preceding diphone in the training sentence
    pub left_phoneme: Option<char>,
    /// Second symbol of the following diphone in the training sentence
    pub right_phoneme: Option<char>,
    /// Index of the unit divided by sentence length, in [0, 1]
    pub sentence_position: f32,

    // Concatenation-cost features at the unit's start and stop times
    pub enrg_start: f32,
    pub enrg_stop: f32,
    pub f0_start: f32,
    pub f0_stop: f32,
    pub mfcc_start: Vec<f32>,
    pub mfcc_stop: Vec<f32>,
}

impl SpeechUnit {
    /// Unit duration in seconds.
    pub fn duration(&self) -> f64 {
        self.signal.len() as f64 * crate::constants::SAMPLE_TIME
    }
}
