//! Hanning window and unit edge fades.

use crate::constants::MIN_LENGTH;

/// Symmetric Hanning window: `0.5 - 0.5 cos(2 pi n / (len - 1))`.
pub fn hanning(len: usize) -> Vec<f32> {
    if len == 1 {
        return vec![1.0];
    }
    (0..len)
        .map(|n| {
            let x = std::f64::consts::TAU * n as f64 / (len - 1) as f64;
            (0.5 - 0.5 * x.cos()) as f32
        })
        .collect()
}

lazy_static::lazy_static! {
    /// The fade window shared by every unit cut.
    pub static ref FADE_WINDOW: Vec<f32> = hanning(MIN_LENGTH);
}

/// Multiply the window's first half into the signal head and its second
/// half into the signal tail. Samples between the two half-windows are
/// untouched. The signal must be longer than the window.
pub fn apply_fade(signal: &mut [f32], window: &[f32]) {
    let half = window.len() / 2;
    for (s, w) in signal.iter_mut().zip(window[..half].iter()) {
        *s *= w;
    }
    let tail = signal.len() - half;
    for (s, w) in signal[tail..].iter_mut().zip(window[window.len() - half..].iter()) {
        *s *= w;
    }
}
