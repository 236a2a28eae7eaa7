//! Graph stages built on the DSP primitives.
//!
//! Each stage is a [`node::GraphNode`] that processes a block in place and
//! exposes its live parameters through [`node::Modulatable`]. The stages are
//! wired into one fixed topology by [`chain::SignalChain`].

/// The fixed effects chain.
pub mod chain;
/// Soft-knee compressor stage.
pub mod compressor;
/// Feedback echo (delay and dub).
pub mod delay;
/// Waveshaping distortion stage.
pub mod distortion;
/// Always-on lowpass stage.
pub mod filter;
/// Core traits shared by all graph nodes.
pub mod node;
/// Gated colored noise sources.
pub mod noise;
/// Pitch-shift stage.
pub mod pitch;
/// Schroeder reverb stage.
pub mod reverb;
/// Stutter (tremolo) stage.
pub mod tremolo;
