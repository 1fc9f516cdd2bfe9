//! Grapheme-to-phoneme transcription for Czech.
//!
//! A multi-pass string rewriter: lowercase, ordered simple
//! substitutions, ordered regex substitutions, regressive voicing
//! assimilation over consonant chains, and final sentence framing.
//! The whole pipeline is a total function over arbitrary UTF-8 input.

pub mod rules;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use rules::{
    devoice, voice, CHAIN_REGIONS, PAIR_CONSONANTS, RECESSIVE_CHARS, REGEX_RULES, SIMPLE_RULES,
    UNVOICED_CONSONANTS, VOICED_CHARS, VOICED_PAIR_CONSONANTS,
};

/// Apply every simple rule once, in declared order. Each rule is a
/// global left-to-right non-overlapping replacement.
fn simple_replacement(txt: &str) -> String {
    let mut txt = txt.to_string();
    for (pattern, replacement) in SIMPLE_RULES {
        txt = txt.replace(pattern, replacement);
    }
    txt
}

/// Apply every regex rule once, in declared order.
fn regex_replacement(txt: &str) -> String {
    let mut txt = txt.to_string();
    for (regex, replacement) in REGEX_RULES.iter() {
        txt = regex.replace_all(&txt, replacement.as_str()).into_owned();
    }
    txt
}

/// Regressive voicing assimilation over pair-consonant chains.
///
/// Each maximal chain (optionally spanning one word boundary) reads its
/// dominant character from the chain end. A voiced dominant voices every
/// unvoiced pair consonant in the run; an unvoiced dominant devoices
/// every voiced pair consonant. Recessive dominants leave the run
/// untouched. Matches are enumerated against the pre-edit string; runs
/// never overlap, so each edit is independent.
pub fn chain_replacement(txt: &str) -> String {
    let original = txt.as_bytes();
    let mut edited = original.to_vec();

    for m in CHAIN_REGIONS.find_iter(txt) {
        let dominant = original[m.end() - 1] as char;

        if RECESSIVE_CHARS.contains(dominant) {
            continue;
        } else if VOICED_CHARS.contains(dominant) {
            for i in m.start()..m.end() {
                let c = original[i] as char;
                if PAIR_CONSONANTS.contains(c) && UNVOICED_CONSONANTS.contains(c) {
                    if let Some(v) = voice(c) {
                        edited[i] = v as u8;
                    }
                }
            }
        } else if UNVOICED_CONSONANTS.contains(dominant) {
            for i in m.start()..m.end() {
                let c = original[i] as char;
                if PAIR_CONSONANTS.contains(c) && VOICED_PAIR_CONSONANTS.contains(c) {
                    if let Some(u) = devoice(c) {
                        edited[i] = u as u8;
                    }
                }
            }
        }
    }

    // Chain symbols are ASCII, so byte-level edits preserve UTF-8.
    String::from_utf8_lossy(&edited).into_owned()
}

/// Final framing: prepend the sentence-boundary marker and drop the last
/// three characters, which duplicate the trailing `|$|` produced by the
/// terminal newline rule.
fn grind(txt: &str) -> String {
    let keep = txt.chars().count().saturating_sub(3);
    let kept: String = txt.chars().take(keep).collect();
    format!("|$|{kept}")
}

/// Transcribe plain Czech text into the internal phonetic alphabet with
/// prosodic boundary markers. Deterministic and total.
pub fn translate(text: &str) -> String {
    let txt = text.to_ascii_lowercase();
    let txt = simple_replacement(&txt);
    let txt = regex_replacement(&txt);
    let txt = chain_replacement(&txt);
    grind(&txt)
}

/// Default output path for a transcription: the input basename with
/// `ortho` replaced by `phntrn`, under `<parent>/../output/`.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().replace("ortho", "phntrn"))
        .unwrap_or_else(|| "phntrn.txt".to_string());
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    let base = parent.parent().unwrap_or_else(|| Path::new(""));
    base.join("output").join(name)
}

/// Transcribe `input` and write the result to `output` (derived from
/// the input path when not given). Returns the output path.
pub fn transcribe_file(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input text: {}", input.display()))?;

    let transcription = translate(&text);

    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => derive_output_path(input),
    };
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(&output_path, &transcription)
        .with_context(|| format!("Failed to write transcription: {}", output_path.display()))?;

    log::info!(
        "Transcribed {} -> {} ({} chars)",
        input.display(),
        output_path.display(),
        transcription.chars().count()
    );
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_kocka() {
        // "kočka.\n": č -> C, '\n' -> '\n|$|', '.' -> '|$|', then framing
        // prepends |$| and drops the final three characters.
        assert_eq!(translate("kočka.\n"), "|$|koCka|$|\n");
    }

    #[test]
    fn test_translate_empty_input() {
        assert_eq!(translate(""), "|$|");
    }

    #[test]
    fn test_translate_output_in_alphabet() {
        let out = translate("příliš žluťoučký kůň.\n");
        for c in out.chars() {
            assert!(
                rules::ALPHABET.contains(c) || c == '\n',
                "unexpected output symbol {c:?} in {out:?}"
            );
        }
    }

    #[test]
    fn test_translate_framing() {
        let out = translate("máma.\nmele.\n");
        assert!(out.starts_with("|$|"));
        // One sentence boundary survives per input newline; the trailing
        // one is trimmed by framing.
        assert_eq!(out.matches('\n').count(), 2);
        assert_eq!(out, "|$|mAma|$|\n|$|mele|$|\n");
    }

    #[test]
    fn test_simple_rules_digraph_before_devoicing() {
        // 'ch' must become 'x' before the word-final 'x|' -> 'G|' rule.
        let out = simple_replacement("hoch konec\n");
        assert!(out.contains("hoG|konec"));
    }

    #[test]
    fn test_glottal_onset_after_boundary() {
        let out = translate("ten oheň.\n");
        assert!(out.contains("|!o"), "missing glottal onset in {out:?}");
    }

    #[test]
    fn test_chain_unvoiced_dominant_devoices() {
        assert_eq!(chain_replacement("leZka"), "leSka");
    }

    #[test]
    fn test_chain_voiced_dominant_is_noop_on_voiced() {
        assert_eq!(chain_replacement("leZba"), "leZba");
    }

    #[test]
    fn test_chain_recessive_dominant() {
        // 'v' never imposes voicing on the chain before it
        assert_eq!(chain_replacement("tv"), "tv");
    }

    #[test]
    fn test_chain_across_word_boundary() {
        // 'd|k': dominant k devoices d
        assert_eq!(chain_replacement("pod|kUry"), "pot|kUry");
    }

    #[test]
    fn test_translate_podkova() {
        let out = translate("podkova\n");
        assert_eq!(out, "|$|potkova\n");
    }

    #[test]
    fn test_chain_dominance_property() {
        // After assimilation towards an unvoiced dominant, no voiced
        // pair consonant remains in the run.
        let out = chain_replacement("zbZks");
        let m = CHAIN_REGIONS.find(&out).unwrap();
        assert_eq!(m.as_str().chars().last(), Some('s'));
        for c in m.as_str().chars() {
            assert!(
                !VOICED_PAIR_CONSONANTS.contains(c),
                "voiced {c} left in {out:?}"
            );
        }
    }

    #[test]
    fn test_translate_pod_kurou() {
        // 'ů' collapses to U, 'ou' to y, the word-final d devoices via
        // the regex pass, and the t|k chain is already unvoiced.
        assert_eq!(translate("pod kůrou\n"), "|$|pot|kUry\n");
    }

    #[test]
    fn test_translate_without_trailing_newline_truncates() {
        // Framing always drops three characters; without a terminal
        // newline they come out of real content.
        assert_eq!(translate("abc"), "|$|");
        assert_eq!(translate("manel"), "|$|ma");
    }

    #[test]
    fn test_regex_devoiced_r_after_voiceless() {
        let out = regex_replacement("tR");
        assert_eq!(out, "tQ");
    }

    #[test]
    fn test_regex_syllabic_r_between_consonants() {
        assert_eq!(regex_replacement("krk"), "kPk");
    }

    #[test]
    fn test_regex_word_final_d_after_vowel() {
        assert_eq!(regex_replacement("had|"), "hat|");
    }

    #[test]
    fn test_derive_output_path() {
        let out = derive_output_path(Path::new("data/input/vety.ortho.txt"));
        assert_eq!(out, PathBuf::from("data/output/vety.phntrn.txt"));
    }

    #[test]
    fn test_transcribe_file_roundtrip() {
        let dir = std::env::temp_dir().join(format!("hlaska_transcribe_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("vety.ortho.txt");
        std::fs::write(&input, "kočka.\n").unwrap();

        let out = dir.join("vety.phntrn.txt");
        transcribe_file(&input, Some(&out)).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "|$|koCka|$|\n");

        std::fs::remove_dir_all(&dir).ok();
    }
}
