//! Fixed numeric constants and corpus directory layout.

/// Synthesis and corpus sample rate in Hz.
pub const SAMPLE_RATE: u32 = 16_000;

/// Duration of one sample in seconds.
pub const SAMPLE_TIME: f64 = 1.0 / SAMPLE_RATE as f64;

/// Alignment tick unit in seconds (HTK convention: 100 ns).
pub const TIME_STEP: f64 = 1.0e-7;

/// Fade-in/fade-out duration at each unit edge in seconds.
pub const FADE_TIME: f64 = 0.01;

/// Shortest usable unit in samples. Units at or below this length cannot
/// carry both fade half-windows and are skipped during inventory build.
pub const MIN_LENGTH: usize = (2.0 * FADE_TIME * SAMPLE_RATE as f64) as usize;

/// Overlap between adjacent fragments during assembly, in samples.
pub const FADE_LEN: usize = 160;

// HDS data directory layout.
pub const MLF_DIR: &str = "mlf";
pub const PM_DIR: &str = "pm";
pub const SPC_DIR: &str = "spc";
pub const FEATS_DIR: &str = "unsel-feats";
pub const PREP_DIR: &str = "prep";
pub const OUT_DIR: &str = "out";

/// Monolithic HTK alignment file at the corpus root, split into
/// per-sentence files on first use.
pub const MASTER_MLF: &str = "phnalign.mlf";

// Persisted artifacts under `prep/`.
pub const INVENTORY_FILE: &str = "inventory.bin";
pub const SIMILARITY_FILE: &str = "phonemes_sim.bin";
pub const BUILD_INFO_FILE: &str = "build_info.json";
