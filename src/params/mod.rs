//! The signal graph parameter model.
//!
//! [`SignalGraphParams`] is the control-side source of truth: one plain struct
//! holding every knob. The audio side never sees it directly; scalar values
//! are published through [`ParamSlots`] (one atomic per [`ParamId`]) and the
//! discrete settings (waveforms, second oscillator) travel as commands.

use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::OscillatorWaveform;

/// Random patch generation.
pub mod randomize;

/*
Parameter Ranges
================

    param                  range        default   unit
    ────────────────────── ──────────── ───────── ────────────
    detune 1 / 2           -100..100    0 / 7     cents
    osc mix                0..1         0.3       0 = osc 1 only
    white/pink/brown       0..1         0         gain
    reverb/delay/dub       0..100       0         wet amount
    filter                 0..100       100       → 800..7800 Hz
    distortion             0..100       0         → drive 0..1.5
    stutter depth          0..1         0
    stutter rate           1..32        4         Hz
    pitch shift            -12..12      0         semitones
    compressor threshold   -60..0       0         dB

Every write is clamped to its range on the control thread, so the audio
thread can trust whatever it loads from a slot.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Detune1,
    Detune2,
    OscMix,
    WhiteNoise,
    PinkNoise,
    BrownNoise,
    Reverb,
    Delay,
    Filter,
    Distortion,
    Dub,
    StutterDepth,
    StutterRate,
    PitchShift,
    CompressorThreshold,
}

impl ParamId {
    pub const COUNT: usize = 15;

    pub const ALL: [ParamId; Self::COUNT] = [
        ParamId::Detune1,
        ParamId::Detune2,
        ParamId::OscMix,
        ParamId::WhiteNoise,
        ParamId::PinkNoise,
        ParamId::BrownNoise,
        ParamId::Reverb,
        ParamId::Delay,
        ParamId::Filter,
        ParamId::Distortion,
        ParamId::Dub,
        ParamId::StutterDepth,
        ParamId::StutterRate,
        ParamId::PitchShift,
        ParamId::CompressorThreshold,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamId::Detune1 => "detune 1",
            ParamId::Detune2 => "detune 2",
            ParamId::OscMix => "osc mix",
            ParamId::WhiteNoise => "white noise",
            ParamId::PinkNoise => "pink noise",
            ParamId::BrownNoise => "brown noise",
            ParamId::Reverb => "reverb",
            ParamId::Delay => "delay",
            ParamId::Filter => "filter",
            ParamId::Distortion => "distortion",
            ParamId::Dub => "dub",
            ParamId::StutterDepth => "stutter depth",
            ParamId::StutterRate => "stutter rate",
            ParamId::PitchShift => "pitch",
            ParamId::CompressorThreshold => "compressor",
        }
    }

    /// Inclusive `(min, max)`.
    pub fn range(self) -> (f32, f32) {
        match self {
            ParamId::Detune1 | ParamId::Detune2 => (-100.0, 100.0),
            ParamId::OscMix
            | ParamId::WhiteNoise
            | ParamId::PinkNoise
            | ParamId::BrownNoise
            | ParamId::StutterDepth => (0.0, 1.0),
            ParamId::Reverb
            | ParamId::Delay
            | ParamId::Filter
            | ParamId::Distortion
            | ParamId::Dub => (0.0, 100.0),
            ParamId::StutterRate => (1.0, 32.0),
            ParamId::PitchShift => (-12.0, 12.0),
            ParamId::CompressorThreshold => (-60.0, 0.0),
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            ParamId::Detune2 => 7.0,
            ParamId::OscMix => 0.3,
            ParamId::Filter => 100.0,
            ParamId::StutterRate => 4.0,
            _ => 0.0,
        }
    }

    /// Clamp into range; NaN becomes the default.
    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default_value();
        }
        let (min, max) = self.range();
        value.clamp(min, max)
    }

    /// Size of one arrow-key nudge in the front end.
    pub fn step(self) -> f32 {
        let (min, max) = self.range();
        match self {
            ParamId::PitchShift | ParamId::StutterRate => 1.0,
            ParamId::CompressorThreshold => 3.0,
            _ => (max - min) / 20.0,
        }
    }
}

/// Which of the two voice oscillators a setting targets.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OscSlot {
    Primary,
    Secondary,
}

/// One parameter mutation, as carried by a `ParamChanged` event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamChange {
    Scalar(ParamId, f32),
    Waveform(OscSlot, OscillatorWaveform),
    SecondOscillator(bool),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SignalGraphParams {
    pub waveform1: OscillatorWaveform,
    pub waveform2: OscillatorWaveform,
    pub second_oscillator: bool,
    pub detune1: f32,
    pub detune2: f32,
    pub osc_mix: f32,
    pub white_noise: f32,
    pub pink_noise: f32,
    pub brown_noise: f32,
    pub reverb: f32,
    pub delay: f32,
    pub filter: f32,
    pub distortion: f32,
    pub dub: f32,
    pub stutter_depth: f32,
    pub stutter_rate: f32,
    pub pitch_shift: f32,
    pub compressor_threshold: f32,
}

impl Default for SignalGraphParams {
    fn default() -> Self {
        Self {
            waveform1: OscillatorWaveform::Sawtooth,
            waveform2: OscillatorWaveform::Square,
            second_oscillator: true,
            detune1: ParamId::Detune1.default_value(),
            detune2: ParamId::Detune2.default_value(),
            osc_mix: ParamId::OscMix.default_value(),
            white_noise: 0.0,
            pink_noise: 0.0,
            brown_noise: 0.0,
            reverb: 0.0,
            delay: 0.0,
            filter: ParamId::Filter.default_value(),
            distortion: 0.0,
            dub: 0.0,
            stutter_depth: 0.0,
            stutter_rate: ParamId::StutterRate.default_value(),
            pitch_shift: 0.0,
            compressor_threshold: 0.0,
        }
    }
}

impl SignalGraphParams {
    fn field_mut(&mut self, id: ParamId) -> &mut f32 {
        match id {
            ParamId::Detune1 => &mut self.detune1,
            ParamId::Detune2 => &mut self.detune2,
            ParamId::OscMix => &mut self.osc_mix,
            ParamId::WhiteNoise => &mut self.white_noise,
            ParamId::PinkNoise => &mut self.pink_noise,
            ParamId::BrownNoise => &mut self.brown_noise,
            ParamId::Reverb => &mut self.reverb,
            ParamId::Delay => &mut self.delay,
            ParamId::Filter => &mut self.filter,
            ParamId::Distortion => &mut self.distortion,
            ParamId::Dub => &mut self.dub,
            ParamId::StutterDepth => &mut self.stutter_depth,
            ParamId::StutterRate => &mut self.stutter_rate,
            ParamId::PitchShift => &mut self.pitch_shift,
            ParamId::CompressorThreshold => &mut self.compressor_threshold,
        }
    }

    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::Detune1 => self.detune1,
            ParamId::Detune2 => self.detune2,
            ParamId::OscMix => self.osc_mix,
            ParamId::WhiteNoise => self.white_noise,
            ParamId::PinkNoise => self.pink_noise,
            ParamId::BrownNoise => self.brown_noise,
            ParamId::Reverb => self.reverb,
            ParamId::Delay => self.delay,
            ParamId::Filter => self.filter,
            ParamId::Distortion => self.distortion,
            ParamId::Dub => self.dub,
            ParamId::StutterDepth => self.stutter_depth,
            ParamId::StutterRate => self.stutter_rate,
            ParamId::PitchShift => self.pitch_shift,
            ParamId::CompressorThreshold => self.compressor_threshold,
        }
    }

    /// Store a clamped value and return what was stored.
    pub fn set(&mut self, id: ParamId, value: f32) -> f32 {
        let clamped = id.clamp(value);
        *self.field_mut(id) = clamped;
        clamped
    }

    pub fn waveform(&self, slot: OscSlot) -> OscillatorWaveform {
        match slot {
            OscSlot::Primary => self.waveform1,
            OscSlot::Secondary => self.waveform2,
        }
    }

    /// Apply one change; returns the change as actually stored.
    pub fn apply(&mut self, change: ParamChange) -> ParamChange {
        match change {
            ParamChange::Scalar(id, value) => ParamChange::Scalar(id, self.set(id, value)),
            ParamChange::Waveform(OscSlot::Primary, waveform) => {
                self.waveform1 = waveform;
                change
            }
            ParamChange::Waveform(OscSlot::Secondary, waveform) => {
                self.waveform2 = waveform;
                change
            }
            ParamChange::SecondOscillator(enabled) => {
                self.second_oscillator = enabled;
                change
            }
        }
    }

    /// Every field expressed as changes, discrete settings first.
    pub fn changes(&self) -> impl Iterator<Item = ParamChange> + '_ {
        [
            ParamChange::Waveform(OscSlot::Primary, self.waveform1),
            ParamChange::Waveform(OscSlot::Secondary, self.waveform2),
            ParamChange::SecondOscillator(self.second_oscillator),
        ]
        .into_iter()
        .chain(
            ParamId::ALL
                .into_iter()
                .map(move |id| ParamChange::Scalar(id, self.get(id))),
        )
    }

    /// Clamp every scalar into range (for values loaded from disk).
    pub fn sanitized(mut self) -> Self {
        for id in ParamId::ALL {
            let value = self.get(id);
            self.set(id, value);
        }
        self
    }
}

/// Lock-free scalar parameter store shared with the audio thread.
///
/// Each slot holds the bit pattern of an `f32`. Writes are relaxed: the audio
/// thread only needs to eventually see the latest value, and every slot is
/// independent.
pub struct ParamSlots {
    slots: [AtomicU32; ParamId::COUNT],
}

impl ParamSlots {
    pub fn new(params: &SignalGraphParams) -> Self {
        let slots = std::array::from_fn(|i| AtomicU32::new(params.get(ParamId::ALL[i]).to_bits()));
        Self { slots }
    }

    #[inline]
    pub fn load(&self, id: ParamId) -> f32 {
        f32::from_bits(self.slots[id.index()].load(Ordering::Relaxed))
    }

    pub fn store(&self, id: ParamId, value: f32) {
        self.slots[id.index()].store(id.clamp(value).to_bits(), Ordering::Relaxed);
    }
}

impl Default for ParamSlots {
    fn default() -> Self {
        Self::new(&SignalGraphParams::default())
    }
}
