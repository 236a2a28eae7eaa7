//! Low-level DSP primitives used by the graph stages.
//!
//! Everything here is allocation-free once constructed and works one sample
//! (or one block) at a time, so it can run inside the audio callback. Buffers
//! that depend on the sample rate are sized in the constructors.

/// Feed-forward soft-knee compressor.
pub mod compressor;
/// Circular delay line with interpolated reads.
pub mod delay;
/// Rational waveshaper.
pub mod distortion;
/// State-variable and one-pole lowpass filters.
pub mod filter;
/// Tremolo LFO.
pub mod lfo;
/// Summing and crossfades.
pub mod mix;
/// White, pink and brown noise.
pub mod noise;
/// Band-limited oscillator waveforms.
pub mod oscillator;
/// Dual-tap delay pitch shifter.
pub mod pitch;
/// Schroeder reverb.
pub mod reverb;
/// Per-sample parameter smoothing.
pub mod smooth;
