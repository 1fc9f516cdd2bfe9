//! Overlap-add assembly of selected signal fragments.

use crate::constants::FADE_LEN;

/// Splice fragments into one signal by overlap-add.
///
/// Every fragment already carries Hanning fades on both edges, so
/// adding each one `FADE_LEN` samples before the previous fragment ends
/// forms a constant-power crossfade. Output length is
/// `sum(len) - (k - 1) * FADE_LEN`.
pub fn assemble(fragments: &[&[f32]]) -> Vec<f32> {
    if fragments.is_empty() {
        return Vec::new();
    }

    let total: usize = fragments.iter().map(|f| f.len()).sum();
    let mut output = vec![0.0f32; total];
    let mut offset = 0usize;

    for fragment in fragments {
        for (i, &sample) in fragment.iter().enumerate() {
            output[offset + i] += sample;
        }
        offset += fragment.len().saturating_sub(FADE_LEN);
    }

    output.truncate(offset + FADE_LEN.min(total));
    output
}
