//! Transcription rule tables and phoneme class membership.
//!
//! The tables are data, not control flow: both passes walk an ordered
//! list of (pattern, replacement) pairs, and the declared order is part
//! of the contract (`ch -> x` must run before `x| -> G|`, the newline
//! rule before the sentence-punctuation rules, and so on).

use lazy_static::lazy_static;
use regex::Regex;

/// The internal phonetic alphabet: every symbol a transcription may
/// contain, including the prosodic markers `$ # | ! %`.
pub const ALPHABET: &str = "ieaouIEAOUyYFfvszSZxhlrRjPbtdDkgmnJcCwWNMGQLH!@$#%|";

/// Consonants without a voiced counterpart-triggering voice.
pub const UNVOICED_CONSONANTS: &str = "ptTkfsSxcCQ";

/// Voiced consonants that pair with an unvoiced counterpart.
pub const VOICED_PAIR_CONSONANTS: &str = "bdDgvzZhwWR";

/// Voiced consonants without an unvoiced pair (sonorants).
pub const VOICED_NONPAIR_CONSONANTS: &str = "mnNljr";

pub const VOWELS: &str = "aeiouAEIOU";

/// Characters whose voicing never imposes on a consonant chain.
pub const RECESSIVE_CHARS: &str = "v";

/// Simple substitution rules, applied once each, in declared order.
/// Each is a global left-to-right non-overlapping replacement.
pub const SIMPLE_RULES: &[(&str, &str)] = &[
    // Palatalisation before front vowels
    ("ni", "Ji"),
    ("ní", "JI"),
    ("ti", "Ti"),
    ("tí", "TI"),
    ("di", "Di"),
    ("dí", "DI"),
    // Vowel length collapse
    ("y", "i"),
    ("ý", "I"),
    ("í", "I"),
    ("é", "E"),
    ("á", "A"),
    ("ó", "O"),
    ("ú", "U"),
    ("ů", "U"),
    // Diphthongs
    ("ou", "y"),
    ("au", "Y"),
    ("eu", "F"),
    // Háček consonants
    ("š", "S"),
    ("ť", "T"),
    ("ň", "J"),
    ("ď", "D"),
    ("ž", "Z"),
    ("č", "C"),
    ("ř", "R"),
    // Affricate clusters
    ("dz", "w"),
    ("dZ", "W"),
    // Newline framing
    ("\n", "\n|$|"),
    // Digraph
    ("ch", "x"),
    // Palatals before ě
    ("dě", "De"),
    ("tě", "Te"),
    ("ně", "Je"),
    ("mě", "mJe"),
    ("ě", "je"),
    ("js", "s"),
    ("\t", ""),
    // Punctuation to prosodic boundaries
    (". ", "|$|"),
    (".", "|$|"),
    ("; ", "|$|"),
    (";", "|$|"),
    (", ", "|#|"),
    (",", "|#|"),
    (" ", "|"),
    // Word-final devoicing of velar fricatives
    ("x|", "G|"),
    ("h|", "G|"),
    // Glottal onset before word-initial vowels
    ("|a", "|!a"),
    ("|e", "|!e"),
    ("|i", "|!i"),
    ("|o", "|!o"),
    ("|u", "|!u"),
    ("|A", "|!A"),
    ("|E", "|!E"),
    ("|I", "|!I"),
    ("|O", "|!O"),
    ("|U", "|!U"),
];

lazy_static! {
    /// Unvoiced ∪ voiced-pair consonants: the symbols subject to chain
    /// voicing assimilation.
    pub static ref PAIR_CONSONANTS: String =
        format!("{}{}", UNVOICED_CONSONANTS, VOICED_PAIR_CONSONANTS);

    /// All consonant symbols.
    pub static ref CONSONANTS: String = format!(
        "{}{}{}",
        UNVOICED_CONSONANTS, VOICED_PAIR_CONSONANTS, VOICED_NONPAIR_CONSONANTS
    );

    /// Symbols that pull a chain towards voicing when dominant.
    pub static ref VOICED_CHARS: String = format!(
        "{}{}{}",
        VOICED_PAIR_CONSONANTS, VOICED_NONPAIR_CONSONANTS, VOWELS
    );

    /// Regex substitution rules, applied once each, in declared order.
    pub static ref REGEX_RULES: Vec<(Regex, String)> = {
        let u = UNVOICED_CONSONANTS;
        let c = &*CONSONANTS;
        let v = VOWELS;
        [
            // Devoiced ř after a voiceless consonant
            (format!("([{u}])R"), "${1}Q".to_string()),
            // Syllabic devoiced nasal between voiceless consonants
            (format!("([{u}])m([\\|{u}])"), "${1}H${2}".to_string()),
            // Syllabic devoiced lateral between voiceless consonants
            (format!("([{u}])l([\\|{u}])"), "${1}L${2}".to_string()),
            // Syllabic r between consonants
            (format!("([{c}])r([\\|{c}])"), "${1}P${2}".to_string()),
            // Syllabic devoiced nasal before a word boundary
            (format!("([{u}])m([\\|])"), "${1}H${2}".to_string()),
            // Word-final devoicing of d
            (format!("([{c}][{v}])d(\\|)"), "${1}t${2}".to_string()),
            // Word-initial z after a consonant-final word
            (format!("([{c}]\\|)z"), "${1}s".to_string()),
        ]
        .into_iter()
        .map(|(pat, rep)| (Regex::new(&pat).unwrap(), rep))
        .collect()
    };

    /// Maximal pair-consonant runs, optionally spanning one word
    /// boundary. Longer chains across several boundaries split into
    /// independent runs.
    pub static ref CHAIN_REGIONS: Regex = {
        let p = &*PAIR_CONSONANTS;
        Regex::new(&format!("[{p}]+\\|?[{p}]+")).unwrap()
    };
}

/// Voiced counterpart of an unvoiced pair consonant.
pub fn voice(c: char) -> Option<char> {
    UNVOICED_CONSONANTS
        .find(c)
        .and_then(|i| VOICED_PAIR_CONSONANTS.chars().nth(i))
}

/// Unvoiced counterpart of a voiced pair consonant.
pub fn devoice(c: char) -> Option<char> {
    VOICED_PAIR_CONSONANTS
        .find(c)
        .and_then(|i| UNVOICED_CONSONANTS.chars().nth(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voicing_map_is_symmetric() {
        for c in UNVOICED_CONSONANTS.chars() {
            let voiced = voice(c).unwrap();
            assert_eq!(devoice(voiced), Some(c), "voicing not symmetric for {c}");
        }
        for c in VOICED_PAIR_CONSONANTS.chars() {
            let unvoiced = devoice(c).unwrap();
            assert_eq!(voice(unvoiced), Some(c), "devoicing not symmetric for {c}");
        }
    }

    #[test]
    fn test_voicing_map_defined_only_on_pairs() {
        assert_eq!(voice('m'), None);
        assert_eq!(devoice('l'), None);
        assert_eq!(voice('a'), None);
        assert_eq!(voice('s'), Some('z'));
        assert_eq!(devoice('h'), Some('x'));
    }

    #[test]
    fn test_pair_classes_are_disjoint() {
        for c in UNVOICED_CONSONANTS.chars() {
            assert!(!VOICED_PAIR_CONSONANTS.contains(c));
            assert!(!VOICED_NONPAIR_CONSONANTS.contains(c));
        }
        for c in VOICED_PAIR_CONSONANTS.chars() {
            assert!(!VOICED_NONPAIR_CONSONANTS.contains(c));
        }
    }

    #[test]
    fn test_rule_outputs_stay_in_alphabet() {
        for (_, replacement) in SIMPLE_RULES {
            for ch in replacement.chars() {
                assert!(
                    ALPHABET.contains(ch) || ch == '\n',
                    "rule output symbol {ch:?} outside the alphabet"
                );
            }
        }
    }

    #[test]
    fn test_chain_regex_spans_one_boundary() {
        let m = CHAIN_REGIONS.find("pot|kUroy").unwrap();
        assert_eq!(m.as_str(), "t|k");
        // Two boundaries split into independent runs
        let runs: Vec<&str> = CHAIN_REGIONS
            .find_iter("ab|cd|gb")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(runs, vec!["b|cd", "gb"]);
    }
}
