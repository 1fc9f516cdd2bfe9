//! Fallback resolution of diphones missing from the inventory.
//!
//! A requested diphone absent from the training data is replaced by the
//! closest recorded one: first by swapping a single symbol for a
//! partition mate (finest similarity level first), then by trying pairs
//! of mates, and finally dropped from the lattice.

use crate::inventory::similarity::PhonemeSimilarity;
use crate::inventory::Inventory;

/// Resolve one diphone to an existing inventory key, or `None` when no
/// substitute exists.
pub fn resolve(diphone: &str, inventory: &Inventory) -> Option<String> {
    if inventory.contains(diphone) {
        return Some(diphone.to_string());
    }

    let mut symbols = diphone.chars();
    let c0 = symbols.next()?;
    let c1 = symbols.next()?;

    let left_mates = PhonemeSimilarity::mates(c0);
    let right_mates = PhonemeSimilarity::mates(c1);

    // Single-symbol swaps, finest partition mates first
    for &p in &left_mates {
        let candidate = format!("{p}{c1}");
        if inventory.contains(&candidate) {
            return Some(candidate);
        }
    }
    for &p in &right_mates {
        let candidate = format!("{c0}{p}");
        if inventory.contains(&candidate) {
            return Some(candidate);
        }
    }

    // Both symbols swapped
    for &p0 in &left_mates {
        for &p1 in &right_mates {
            let candidate = format!("{p0}{p1}");
            if inventory.contains(&candidate) {
                return Some(candidate);
            }
        }
    }

    None
}

/// Rewrite a requested diphone sequence so every element exists in the
/// inventory. Unresolvable diphones are dropped with a warning and the
/// sequence shortens.
pub fn resolve_sequence(diphones: &[String], inventory: &Inventory) -> Vec<String> {
    diphones
        .iter()
        .filter_map(|d| {
            let resolved = resolve(d, inventory);
            if resolved.is_none() {
                log::warn!("No inventory substitute for diphone \"{d}\", dropping it");
            } else if resolved.as_deref() != Some(d.as_str()) {
                log::debug!("Diphone \"{d}\" resolved to \"{}\"", resolved.as_deref().unwrap());
            }
            resolved
        })
        .collect()
}
