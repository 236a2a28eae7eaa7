//! Random patch generation.
//!
//! The randomizer rolls a fresh [`SignalGraphParams`] inside musically useful
//! sub-ranges of each parameter's full range. Noise and heavy effects are
//! kept modest so a random patch is still playable; pitch shift lands on
//! whole semitones.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ParamId, SignalGraphParams};
use crate::dsp::oscillator::OscillatorWaveform;

/// Sub-range the randomizer draws from. Always inside [`ParamId::range`].
pub fn random_range(id: ParamId) -> (f32, f32) {
    match id {
        ParamId::Detune1 => (-10.0, 10.0),
        ParamId::Detune2 => (-25.0, 25.0),
        ParamId::OscMix => (0.0, 1.0),
        ParamId::WhiteNoise | ParamId::PinkNoise | ParamId::BrownNoise => (0.0, 0.15),
        ParamId::Reverb | ParamId::Delay | ParamId::Dub => (0.0, 60.0),
        ParamId::Filter => (20.0, 100.0),
        ParamId::Distortion => (0.0, 70.0),
        ParamId::StutterDepth => (0.0, 1.0),
        ParamId::StutterRate => (1.0, 32.0),
        ParamId::PitchShift => (-12.0, 12.0),
        ParamId::CompressorThreshold => (-60.0, 0.0),
    }
}

pub struct Randomizer {
    rng: StdRng,
}

impl Randomizer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence of patches.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn roll(&mut self, id: ParamId) -> f32 {
        let (min, max) = random_range(id);
        let value = if id == ParamId::PitchShift {
            self.rng.random_range(min as i32..=max as i32) as f32
        } else {
            self.rng.random_range(min..=max)
        };
        id.clamp(value)
    }

    fn waveform(&mut self) -> OscillatorWaveform {
        let index = self.rng.random_range(0..OscillatorWaveform::ALL.len());
        OscillatorWaveform::ALL[index]
    }

    /// A new patch. The second-oscillator switch is left as in `current`.
    pub fn generate(&mut self, current: &SignalGraphParams) -> SignalGraphParams {
        let mut params = SignalGraphParams {
            waveform1: self.waveform(),
            waveform2: self.waveform(),
            second_oscillator: current.second_oscillator,
            ..SignalGraphParams::default()
        };
        for id in ParamId::ALL {
            let value = self.roll(id);
            params.set(id, value);
        }
        params
    }
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}
