//! Czech text-to-speech in two stages: a rule-based phonetic
//! transcriber and a concatenative diphone unit-selection synthesizer.
//!
//! The offline path ingests a training corpus (waveforms, pitch marks,
//! phoneme alignments, prosodic feature tracks) and builds a persistent
//! diphone inventory plus a phoneme-similarity table. The online path
//! transcribes Czech text into an internal phonetic alphabet and, per
//! sentence, runs a Viterbi search over the inventory to pick and
//! splice recorded fragments into a 16 kHz waveform.

pub mod audio;
pub mod constants;
pub mod corpus;
pub mod error;
pub mod inventory;
pub mod synth;
pub mod transcribe;
pub mod types;

pub use error::SynthesisError;
pub use inventory::similarity::PhonemeSimilarity;
pub use inventory::Inventory;
pub use types::SpeechUnit;
