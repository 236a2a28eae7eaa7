use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::dsp::smooth::SmoothedParam;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::params::OscSlot;
use crate::synth::message::{VoiceSpec, VoiceTag};

/*
Audio Voice
===========

Two detuned oscillators, each with its own gain, behind a short linear
declick ramp:

    osc 1 (f · 2^(d1/1200)) × g1 ──┐
                                    (+) ──→ × ramp ──→ out
    osc 2 (f · 2^(d2/1200)) × g2 ──┘      (only if enabled)

The ramp rises over ~5 ms at note-on and falls over ~5 ms after note-off;
once it reaches zero the voice frees itself. There is no other envelope.
*/

/// Declick ramp length.
pub const DECLICK_MS: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Sounding, ramp up or holding
    Releasing, // Key released, ramp falling
}

#[inline]
fn cents_to_ratio(cents: f32) -> f32 {
    2.0_f32.powf(cents / 1200.0)
}

pub struct Voice {
    tag: VoiceTag,
    state: VoiceState,
    age: u64,
    frequency: f32,
    oscillators: [OscillatorBlock; 2],
    ratios: [f32; 2],
    gains: [SmoothedParam; 2],
    second_oscillator: bool,
    ramp: f32,
    ramp_step: f32,
}

impl Voice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            tag: 0,
            state: VoiceState::Free,
            age: 0,
            frequency: 0.0,
            oscillators: [OscillatorBlock::sine(), OscillatorBlock::sine()],
            ratios: [1.0, 1.0],
            gains: [
                SmoothedParam::with_default_time(0.0, sample_rate),
                SmoothedParam::with_default_time(0.0, sample_rate),
            ],
            second_oscillator: false,
            ramp: 0.0,
            ramp_step: 1.0 / (DECLICK_MS / 1000.0 * sample_rate).max(1.0),
        }
    }

    pub fn start(&mut self, tag: VoiceTag, spec: &VoiceSpec, age: u64) {
        self.tag = tag;
        self.state = VoiceState::Active;
        self.age = age;
        self.frequency = spec.frequency;
        self.second_oscillator = spec.second_oscillator;
        for i in 0..2 {
            self.oscillators[i].set_waveform(spec.waveforms[i]);
            self.oscillators[i].reset();
            self.ratios[i] = cents_to_ratio(spec.detune_cents[i]);
            self.gains[i].snap(spec.gains[i]);
        }
        self.ramp = 0.0;
    }

    pub fn release(&mut self) {
        if self.state == VoiceState::Active {
            self.state = VoiceState::Releasing;
        }
    }

    /// Glide both oscillator gains to new values.
    pub fn set_gains(&mut self, gains: [f32; 2]) {
        self.gains[0].set_target(gains[0]);
        self.gains[1].set_target(gains[1]);
    }

    /// Retype one oscillator without restarting it.
    pub fn retype(&mut self, slot: OscSlot, waveform: OscillatorWaveform) {
        let index = match slot {
            OscSlot::Primary => 0,
            OscSlot::Secondary => 1,
        };
        self.oscillators[index].set_waveform(waveform);
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.ramp = 0.0;
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn tag(&self) -> VoiceTag {
        self.tag
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// Current oscillator shape, for inspection.
    pub fn waveform(&self, slot: OscSlot) -> OscillatorWaveform {
        match slot {
            OscSlot::Primary => self.oscillators[0].waveform(),
            OscSlot::Secondary => self.oscillators[1].waveform(),
        }
    }
}

impl GraphNode for Voice {
    /// Writes (not adds) the voice into `out`.
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.state == VoiceState::Free {
            out.fill(0.0);
            return;
        }

        let f1 = self.frequency * self.ratios[0];
        let f2 = self.frequency * self.ratios[1];
        for sample in out.iter_mut() {
            let mut value =
                self.oscillators[0].next_sample(f1, ctx.sample_rate) * self.gains[0].next();
            let g2 = self.gains[1].next();
            if self.second_oscillator {
                value += self.oscillators[1].next_sample(f2, ctx.sample_rate) * g2;
            }

            self.ramp = match self.state {
                VoiceState::Releasing => (self.ramp - self.ramp_step).max(0.0),
                _ => (self.ramp + self.ramp_step).min(1.0),
            };
            *sample = value * self.ramp;
        }

        if self.state == VoiceState::Releasing && self.ramp <= 0.0 {
            self.free();
        }
    }

    fn is_active(&self) -> bool {
        self.state != VoiceState::Free
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(second: bool) -> VoiceSpec {
        VoiceSpec {
            frequency: 440.0,
            waveforms: [OscillatorWaveform::Sine, OscillatorWaveform::Square],
            detune_cents: [0.0, 0.0],
            gains: [0.4, 0.4],
            second_oscillator: second,
        }
    }

    #[test]
    fn ramps_in_without_a_click() {
        let ctx = RenderCtx::new(48_000.0);
        let mut voice = Voice::new(ctx.sample_rate);
        voice.start(1, &spec(true), 0);
        let mut buffer = vec![0.0f32; 64];
        voice.render_block(&mut buffer, &ctx);
        assert!(buffer[0].abs() < 0.01);
    }

    #[test]
    fn frees_itself_after_release_ramp() {
        let ctx = RenderCtx::new(48_000.0);
        let mut voice = Voice::new(ctx.sample_rate);
        voice.start(7, &spec(true), 0);
        let mut buffer = vec![0.0f32; 512];
        voice.render_block(&mut buffer, &ctx);

        voice.release();
        assert_eq!(voice.state(), VoiceState::Releasing);
        // 5 ms at 48 kHz = 240 samples
        voice.render_block(&mut buffer, &ctx);
        assert!(voice.is_free());
    }

    #[test]
    fn disabled_second_oscillator_is_silent() {
        let ctx = RenderCtx::new(48_000.0);
        let mut voice = Voice::new(ctx.sample_rate);
        let mut only_second = spec(false);
        only_second.gains = [0.0, 1.0];
        voice.start(2, &only_second, 0);
        let mut buffer = vec![1.0f32; 256];
        voice.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn retype_changes_shape_in_place() {
        let mut voice = Voice::new(48_000.0);
        voice.start(3, &spec(true), 0);
        voice.retype(OscSlot::Secondary, OscillatorWaveform::Triangle);
        assert_eq!(voice.waveform(OscSlot::Secondary), OscillatorWaveform::Triangle);
        assert_eq!(voice.state(), VoiceState::Active);
    }
}
