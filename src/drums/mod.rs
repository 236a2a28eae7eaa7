//! Drum sample sources and the one-shot player that sounds them.
//!
//! A kit is anything that can turn a drum row name (`"kick"`, `"snare"`,
//! ...) into a mono buffer at the engine rate. Samples are resolved once,
//! when the audio processor is built; the audio thread only ever reads them.

pub mod player;
pub mod synth_kit;
pub mod wav_kit;

pub use player::{DrumPlayer, MAX_ONE_SHOTS};
pub use synth_kit::SynthKit;
pub use wav_kit::WavKit;

/// Resolves drum voice names to mono sample buffers.
pub trait SampleSource: Send {
    /// Mono samples for `voice` rendered or resampled to `sample_rate`.
    /// `None` when the kit has nothing for that name; the row stays silent.
    fn resolve(&self, voice: &str, sample_rate: u32) -> Option<Vec<f32>>;
}

impl<T: SampleSource + ?Sized> SampleSource for Box<T> {
    fn resolve(&self, voice: &str, sample_rate: u32) -> Option<Vec<f32>> {
        (**self).resolve(voice, sample_rate)
    }
}
