//! Hlaska CLI — Czech phonetic transcription and diphone synthesis.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use hlaska_core::inventory::{load_or_prepare, Inventory};
use hlaska_core::synth::synthesize_file;
use hlaska_core::transcribe::transcribe_file;

#[derive(Parser)]
#[command(
    name = "hlaska",
    about = "Czech text-to-speech: phonetic transcription and unit-selection synthesis",
    version,
)]
struct Cli {
    /// Show verbose output
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe a Czech text file into the phonetic alphabet
    Transcribe {
        /// Input file with written Czech text
        input: PathBuf,
        /// Output file for the phonetic transcription (derived from the
        /// input path when omitted)
        output: Option<PathBuf>,
    },
    /// Transcribe a text file and synthesise one WAV per line
    Synthesize {
        /// Input file with written Czech text
        input: PathBuf,
        /// HDS data directory (mlf/, pm/, spc/, unsel-feats/, prep/)
        hds_data_dir: PathBuf,
        /// Directory for the output WAV files
        output_dir: PathBuf,
    },
    /// Export every inventory unit as a WAV for inspection
    DumpUnits {
        /// HDS data directory holding the inventory artifacts
        hds_data_dir: PathBuf,
        /// Directory for the unit WAV tree (defaults to `<HDS>/out/`)
        output_dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Transcribe { input, output } => run_transcribe(input, output),
        Command::Synthesize { input, hds_data_dir, output_dir } => {
            run_synthesize(input, hds_data_dir, output_dir)
        }
        Command::DumpUnits { hds_data_dir, output_dir } => run_dump_units(hds_data_dir, output_dir),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run_transcribe(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    if !input.is_file() {
        bail!("File not found: {}", input.display());
    }
    let out = transcribe_file(&input, output.as_deref())?;
    println!("{}", out.display());
    Ok(())
}

fn run_synthesize(input: PathBuf, hds_data_dir: PathBuf, output_dir: PathBuf) -> Result<()> {
    if !input.is_file() {
        bail!("File not found: {}", input.display());
    }
    if !hds_data_dir.is_dir() {
        bail!("Directory not found: {}", hds_data_dir.display());
    }

    let written = synthesize_file(&input, &hds_data_dir, &output_dir)?;
    if written.is_empty() {
        bail!("No lines could be synthesised");
    }
    println!("Wrote {} WAV file(s) to {}", written.len(), output_dir.display());
    Ok(())
}

fn run_dump_units(hds_data_dir: PathBuf, output_dir: Option<PathBuf>) -> Result<()> {
    if !hds_data_dir.is_dir() {
        bail!("Directory not found: {}", hds_data_dir.display());
    }
    let output_dir = output_dir.unwrap_or_else(|| hds_data_dir.join(hlaska_core::constants::OUT_DIR));
    let (inventory, _): (Inventory, _) = load_or_prepare(&hds_data_dir)?;
    let written = inventory.export_unit_wavs(&output_dir)?;
    println!("Wrote {written} unit WAV(s) to {}", output_dir.display());
    Ok(())
}
