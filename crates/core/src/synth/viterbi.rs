//! Unit selection over the diphone lattice.
//!
//! A Viterbi search: per-position target-cost vectors, per-transition
//! concatenation-cost matrices, forward accumulation with explicit
//! back-pointers, and a back-trace of the optimal path. Branching
//! varies per position, so every table is jagged; only the previous
//! cumulative column is needed while sweeping forward.

use crate::error::SynthesisError;
use crate::inventory::similarity::PhonemeSimilarity;
use crate::inventory::Inventory;
use crate::types::SpeechUnit;

const W_SENT_POS: f32 = 0.1;
const W_SURR: f32 = 1.0;
const W_ENRG: f32 = 1.0;
const W_F0: f32 = 1.0;
const W_MFCC: f32 = 0.01;

/// The selected path through the lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPath {
    /// Chosen alternative index per lattice position
    pub indices: Vec<usize>,
    /// Total target plus concatenation cost of the path
    pub total_cost: f32,
}

/// Penalty for choosing `unit` at position `i` of `n`, judged against
/// the neighbouring requested diphones.
fn target_cost(
    unit: &SpeechUnit,
    i: usize,
    n: usize,
    left: Option<char>,
    right: Option<char>,
    similarity: &PhonemeSimilarity,
) -> f32 {
    let mut cost = (unit.sentence_position - i as f32 / n as f32).abs() * W_SENT_POS;
    if let Some(l) = left {
        cost += similarity.loss(l, unit.left_phoneme) * W_SURR;
    }
    if let Some(r) = right {
        cost += similarity.loss(r, unit.right_phoneme) * W_SURR;
    }
    cost
}

/// Penalty for splicing `q` directly after `p`.
fn concat_cost(p: &SpeechUnit, q: &SpeechUnit) -> f32 {
    let mfcc_dist: f32 = p
        .mfcc_stop
        .iter()
        .zip(q.mfcc_start.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f32>()
        .sqrt();

    (p.enrg_stop - q.enrg_start).abs() * W_ENRG
        + (p.f0_stop - q.f0_start).abs() * W_F0
        + mfcc_dist * W_MFCC
}

/// Index of the smallest value; ties keep the smallest index.
fn stable_argmin(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[best] {
            best = i;
        }
    }
    best
}

/// Select one unit per diphone, minimising total target plus
/// concatenation cost. The sequence must already be resolved: every
/// diphone has at least one inventory alternative.
pub fn decode(
    diphones: &[String],
    inventory: &Inventory,
    similarity: &PhonemeSimilarity,
) -> Result<DecodedPath, SynthesisError> {
    let n = diphones.len();
    let alternatives: Vec<&[SpeechUnit]> = diphones
        .iter()
        .map(|d| {
            inventory
                .get(d)
                .filter(|units| !units.is_empty())
                .ok_or_else(|| SynthesisError::EmptyAlternatives(d.clone()))
        })
        .collect::<Result<_, _>>()?;
    if n == 0 {
        return Ok(DecodedPath { indices: Vec::new(), total_cost: 0.0 });
    }

    let first_symbol = |d: &String| d.chars().next();
    let second_symbol = |d: &String| d.chars().nth(1);

    // Target-cost vectors, one per position
    let target: Vec<Vec<f32>> = (0..n)
        .map(|i| {
            let left = i.checked_sub(1).and_then(|j| first_symbol(&diphones[j]));
            let right = diphones.get(i + 1).and_then(second_symbol);
            alternatives[i]
                .iter()
                .map(|u| target_cost(u, i, n, left, right, similarity))
                .collect()
        })
        .collect();

    // Forward accumulation with explicit back-pointers
    let mut cum = target[0].clone();
    let mut back_pointers: Vec<Vec<usize>> = Vec::with_capacity(n);

    for i in 1..n {
        let mut column = Vec::with_capacity(alternatives[i].len());
        let mut pointers = Vec::with_capacity(alternatives[i].len());

        for (q, unit) in alternatives[i].iter().enumerate() {
            let transitions: Vec<f32> = alternatives[i - 1]
                .iter()
                .enumerate()
                .map(|(p, prev)| cum[p] + concat_cost(prev, unit))
                .collect();
            let best = stable_argmin(&transitions);
            column.push(target[i][q] + transitions[best]);
            pointers.push(best);
        }

        cum = column;
        back_pointers.push(pointers);
    }

    // Back-trace
    let mut indices = vec![0usize; n];
    indices[n - 1] = stable_argmin(&cum);
    for i in (1..n).rev() {
        indices[i - 1] = back_pointers[i - 1][indices[i]];
    }

    Ok(DecodedPath { total_cost: cum[indices[n - 1]], indices })
}

/// The signal fragments of a decoded path, in lattice order.
pub fn path_signals<'a>(
    diphones: &[String],
    path: &DecodedPath,
    inventory: &'a Inventory,
) -> Vec<&'a [f32]> {
    diphones
        .iter()
        .zip(path.indices.iter())
        .filter_map(|(d, &alt)| inventory.get(d).map(|units| units[alt].signal.as_slice()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn unit(position: f32) -> SpeechUnit {
        SpeechUnit {
            signal: vec![0.0; 400],
            left_phoneme: None,
            right_phoneme: None,
            sentence_position: position,
            enrg_start: 0.0,
            enrg_stop: 0.0,
            f0_start: 0.0,
            f0_stop: 0.0,
            mfcc_start: Vec::new(),
            mfcc_stop: Vec::new(),
        }
    }

    /// Similarity table with handcrafted pair losses for cost shaping.
    fn similarity(pairs: &[((char, char), f32)]) -> PhonemeSimilarity {
        PhonemeSimilarity {
            losses: pairs.iter().copied().collect::<BTreeMap<_, _>>(),
            unrelated: 1.0,
            missing_context: 2.0,
        }
    }

    #[test]
    fn test_two_step_lattice_picks_cheaper_total() {
        // D = ["ab", "bc"]; t(ab,u0)=0, t(bc,v0)=1, t(bc,v1)=3;
        // c(u0,v0)=0.5, c(u0,v1)=0. Path u0->v0 wins: 0+0.5+1 = 1.5.
        let sim = similarity(&[(('a', 'q'), 3.0), (('c', 'c'), 0.0)]);

        let mut u0 = unit(0.0);
        u0.right_phoneme = Some('c'); // exact context, loss 0
        u0.enrg_stop = 0.5;

        let mut v0 = unit(0.5);
        v0.left_phoneme = Some('n'); // unrelated to 'a' -> loss 1.0
        v0.enrg_start = 0.0; // |0.5 - 0.0| = 0.5

        let mut v1 = unit(0.5);
        v1.left_phoneme = Some('q'); // crafted loss 3.0
        v1.enrg_start = 0.5; // |0.5 - 0.5| = 0

        let mut inv = Inventory::default();
        inv.insert("ab".into(), u0);
        inv.insert("bc".into(), v0);
        inv.insert("bc".into(), v1);

        let diphones: Vec<String> = ["ab", "bc"].iter().map(|s| s.to_string()).collect();
        let path = decode(&diphones, &inv, &sim).unwrap();
        assert_eq!(path.indices, vec![0, 0]);
        assert!((path.total_cost - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_tie_breaks_to_smallest_index() {
        // Two identical alternatives: the first wins.
        let mut inv = Inventory::default();
        inv.insert("ab".into(), unit(0.0));
        inv.insert("ab".into(), unit(0.0));
        let sim = similarity(&[]);

        let diphones = vec!["ab".to_string()];
        let path = decode(&diphones, &inv, &sim).unwrap();
        assert_eq!(path.indices, vec![0]);
    }

    #[test]
    fn test_back_pointer_consistency() {
        // Three positions, two alternatives each, distinguished only by
        // energy continuity; the chosen predecessor must be an argmin
        // witness at every step.
        let mut inv = Inventory::default();
        for (key, stops) in [("ab", [1.0, 4.0]), ("bc", [2.0, 3.0]), ("cd", [0.0, 0.0])] {
            for stop in stops {
                let mut u = unit(0.0);
                u.enrg_start = stop;
                u.enrg_stop = stop;
                inv.insert(key.to_string(), u);
            }
        }
        let sim = similarity(&[]);
        let diphones: Vec<String> = ["ab", "bc", "cd"].iter().map(|s| s.to_string()).collect();
        let path = decode(&diphones, &inv, &sim).unwrap();

        // Exhaustive check of decoder optimality over all 8 paths
        let alts = |d: &str| inv.get(d).unwrap();
        let n = diphones.len();
        let exhaustive_target = |i: usize, alt: usize| {
            let left = i.checked_sub(1).and_then(|j| diphones[j].chars().next());
            let right = diphones.get(i + 1).and_then(|d| d.chars().nth(1));
            target_cost(&alts(&diphones[i])[alt], i, n, left, right, &sim)
        };
        let mut best = f32::INFINITY;
        let mut best_path = [0usize; 3];
        for p0 in 0..2 {
            for p1 in 0..2 {
                for p2 in 0..2 {
                    let cost = exhaustive_target(0, p0)
                        + exhaustive_target(1, p1)
                        + exhaustive_target(2, p2)
                        + concat_cost(&alts("ab")[p0], &alts("bc")[p1])
                        + concat_cost(&alts("bc")[p1], &alts("cd")[p2]);
                    if cost < best {
                        best = cost;
                        best_path = [p0, p1, p2];
                    }
                }
            }
        }
        assert!((path.total_cost - best).abs() < 1e-6);
        assert_eq!(path.indices, best_path.to_vec());
        // The cheap chain follows energy continuity 1.0 -> 2.0 -> 0.0
        assert_eq!(path.indices, vec![0, 0, 0]);
    }

    #[test]
    fn test_empty_alternatives_is_an_error() {
        let inv = Inventory::default();
        let sim = similarity(&[]);
        let err = decode(&["ab".to_string()], &inv, &sim).unwrap_err();
        assert!(matches!(err, SynthesisError::EmptyAlternatives(d) if d == "ab"));
    }

    #[test]
    fn test_empty_sequence_decodes_to_nothing() {
        let inv = Inventory::default();
        let sim = similarity(&[]);
        let path = decode(&[], &inv, &sim).unwrap();
        assert!(path.indices.is_empty());
        assert_eq!(path.total_cost, 0.0);
    }

    #[test]
    fn test_path_signals_in_order() {
        let mut inv = Inventory::default();
        let mut a = unit(0.0);
        a.signal = vec![1.0; 400];
        let mut b = unit(0.0);
        b.signal = vec![2.0; 500];
        inv.insert("ab".into(), a);
        inv.insert("bc".into(), b);

        let diphones: Vec<String> = ["ab", "bc"].iter().map(|s| s.to_string()).collect();
        let path = DecodedPath { indices: vec![0, 0], total_cost: 0.0 };
        let signals = path_signals(&diphones, &path, &inv);
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].len(), 400);
        assert_eq!(signals[1][0], 2.0);
    }
}
