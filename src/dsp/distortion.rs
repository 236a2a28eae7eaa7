//! Waveshaping distortion.
//!
//! The shaper is a rational soft clipper whose knee sharpens with `k`:
//!
//! ```text
//!   f(x) = (1 + k) · x / (1 + k · |x|)
//!
//!   k = 0    f(x) = x                 (identity)
//!   k = 5    gentle saturation
//!   k = 30   close to a hard clip, but still smooth at the corner
//! ```
//!
//! `f(±1) = ±1` for every `k`, so full-scale input never grows louder; only
//! the quieter parts of the waveform get pushed up toward the rails. That
//! pushing is where the added harmonics come from.
//!
//! The control surface speaks a 0-100 amount. It maps to a drive of 0-1.5,
//! and `k = 20 · drive`, so the knob tops out at `k = 30`.

/// Largest drive the 0-100 amount reaches.
pub const MAX_DRIVE: f32 = 1.5;
/// Curve steepness per unit of drive.
pub const DRIVE_TO_K: f32 = 20.0;

/// Map a 0-100 amount to drive in 0-1.5.
#[inline]
pub fn amount_to_drive(amount: f32) -> f32 {
    (amount.clamp(0.0, 100.0) / 100.0) * MAX_DRIVE
}

#[inline]
pub fn waveshape(sample: f32, drive: f32) -> f32 {
    let k = DRIVE_TO_K * drive.max(0.0);
    (1.0 + k) * sample / (1.0 + k * sample.abs())
}

pub fn waveshape_buffer(buffer: &mut [f32], drive: f32) {
    for sample in buffer.iter_mut() {
        *sample = waveshape(*sample, drive);
    }
}
