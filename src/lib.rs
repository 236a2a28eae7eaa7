pub mod capture; // Recording taps, float container, WAV serialization
pub mod config;
pub mod drums; // One-shot drum sample sources
pub mod dsp;
pub mod engine; // Control-side context and the realtime processor
pub mod error;
pub mod graph; // Fixed effect chain and its stages
pub mod io;
pub mod params; // Signal graph parameter model
pub mod sequencing; // Step clock, melodic and drum sequencers
pub mod synth; // Voice management and polyphony

pub use config::EngineConfig;
pub use engine::{AudioEngine, AudioProcessor, Origin};
pub use error::{CaptureError, DecodeError, EncodeError, VoiceError};
pub use params::{ParamId, SignalGraphParams};
pub use synth::note::NoteId;

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Four seconds at 48 kHz; enough for the dub echo and the pitch shifter window.
pub const MAX_DELAY_SAMPLES: usize = 192_000;
/// Concurrent held voices.
pub const MAX_POLYPHONY: usize = 4;
/// Steps per pattern for both sequencers.
pub const STEPS_PER_PATTERN: usize = 8;
