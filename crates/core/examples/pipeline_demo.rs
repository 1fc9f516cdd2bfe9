//! Demo: transcribe a line of Czech and synthesise it from a synthetic
//! diphone inventory, without any training corpus on disk.
//!
//! Run with: cargo run -p hlaska-core --example pipeline_demo

use hlaska_core::constants::{MIN_LENGTH, SAMPLE_RATE};
use hlaska_core::synth::{assemble, line_to_diphones, resolver, viterbi};
use hlaska_core::types::SpeechUnit;
use hlaska_core::{Inventory, PhonemeSimilarity};

/// A unit carrying a faded sine burst, pitched per diphone so the
/// output is audibly segmented.
fn synthetic_unit(freq: f64) -> SpeechUnit {
    let len = 4 * MIN_LENGTH;
    let mut signal: Vec<f32> = (0..len)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE as f64;
            ((std::f64::consts::TAU * freq * t).sin() * 8000.0) as f32
        })
        .collect();
    let window = hlaska_core::audio::window::hanning(MIN_LENGTH);
    hlaska_core::audio::window::apply_fade(&mut signal, &window);

    SpeechUnit {
        signal,
        left_phoneme: None,
        right_phoneme: None,
        sentence_position: 0.5,
        enrg_start: 1.0,
        enrg_stop: 1.0,
        f0_start: freq as f32,
        f0_stop: freq as f32,
        mfcc_start: vec![0.0; 12],
        mfcc_stop: vec![0.0; 12],
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let text = "dobrý den.\n";
    let transcription = hlaska_core::transcribe::translate(text);
    println!("text:          {text:?}");
    println!("transcription: {transcription:?}");

    let line = transcription.lines().next().unwrap();
    let requested = line_to_diphones(line);
    println!("diphones:      {requested:?}");

    // One synthetic unit per requested diphone, at a rising pitch
    let mut inventory = Inventory::default();
    for (i, diphone) in requested.iter().enumerate() {
        inventory.insert(diphone.clone(), synthetic_unit(220.0 + 20.0 * i as f64));
    }
    let similarity = PhonemeSimilarity::build();

    let resolved = resolver::resolve_sequence(&requested, &inventory);
    let path = viterbi::decode(&resolved, &inventory, &similarity)?;
    let fragments = viterbi::path_signals(&resolved, &path, &inventory);
    let samples = assemble::assemble(&fragments);

    let out = std::env::temp_dir().join("hlaska_demo.wav");
    hlaska_core::audio::io::write_wav(&out, &samples, SAMPLE_RATE)?;
    println!(
        "wrote {} ({} samples, {:.2}s, path cost {:.3})",
        out.display(),
        samples.len(),
        samples.len() as f64 / SAMPLE_RATE as f64,
        path.total_cost
    );
    Ok(())
}
