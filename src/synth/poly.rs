use crate::dsp::mix::sum_in_place;
use crate::dsp::oscillator::OscillatorWaveform;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::params::OscSlot;
use crate::synth::message::{SynthMessage, VoiceSpec, VoiceTag};
use crate::synth::voice::{Voice, VoiceState};
use crate::{MAX_BLOCK_SIZE, MAX_POLYPHONY};

/// Audio-side voices: twice the held-note cap, so release tails never block.
pub const VOICE_POOL_SIZE: usize = MAX_POLYPHONY * 2;

/// Bus trim so four full-velocity voices stay near full scale.
pub const VOICE_BUS_GAIN: f32 = 0.5;

/// The audio-thread voice pool.
///
/// Voices are preallocated; starting a note only claims a free slot. When
/// no slot is free the oldest releasing voice is stolen, and failing that
/// the oldest voice overall.
pub struct PolySynth {
    voices: Vec<Voice>,
    temp_buffer: Vec<f32>,
    frame_counter: u64,
    ctx: RenderCtx,
}

impl PolySynth {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: (0..VOICE_POOL_SIZE).map(|_| Voice::new(sample_rate)).collect(),
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            frame_counter: 0,
            ctx: RenderCtx::new(sample_rate),
        }
    }

    /// Apply a voice command. Returns `false` for messages that are not voice-related.
    pub fn handle(&mut self, message: &SynthMessage) -> bool {
        match *message {
            SynthMessage::NoteOn { tag, ref spec } => self.note_on(tag, spec),
            SynthMessage::NoteOff { tag } => {
                if let Some(voice) = self.find_voice(tag) {
                    voice.release();
                }
            }
            SynthMessage::SetGains { tag, gains } => {
                if let Some(voice) = self.find_voice(tag) {
                    voice.set_gains(gains);
                }
            }
            SynthMessage::SetWaveform { slot, waveform } => self.retype(slot, waveform),
            SynthMessage::AllNotesOff => {
                for voice in &mut self.voices {
                    voice.release();
                }
            }
            SynthMessage::Panic => {
                for voice in &mut self.voices {
                    voice.free();
                }
            }
            _ => return false,
        }
        true
    }

    fn note_on(&mut self, tag: VoiceTag, spec: &VoiceSpec) {
        let age = self.frame_counter;
        let index = self.allocate_voice();
        self.voices[index].start(tag, spec, age);
    }

    fn retype(&mut self, slot: OscSlot, waveform: OscillatorWaveform) {
        for voice in self.voices.iter_mut().filter(|v| !v.is_free()) {
            voice.retype(slot, waveform);
        }
    }

    /// Add every sounding voice into `out`.
    pub fn render_block(&mut self, out: &mut [f32]) {
        let len = out.len().min(MAX_BLOCK_SIZE);
        for voice in &mut self.voices {
            if voice.is_free() {
                continue;
            }
            let temp = &mut self.temp_buffer[..len];
            voice.render_block(temp, &self.ctx);
            for sample in temp.iter_mut() {
                *sample *= VOICE_BUS_GAIN;
            }
            sum_in_place(&mut out[..len], temp);
        }

        self.frame_counter += len as u64;
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_free()).count()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    fn allocate_voice(&mut self) -> usize {
        // First pass: free voice
        if let Some(index) = self.voices.iter().position(|v| v.is_free()) {
            return index;
        }

        // Second pass: oldest releasing voice
        let releasing = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == VoiceState::Releasing)
            .min_by_key(|(_, v)| v.age())
            .map(|(index, _)| index);

        releasing.unwrap_or_else(|| {
            self.voices
                .iter()
                .enumerate()
                .min_by_key(|(_, v)| v.age())
                .map(|(index, _)| index)
                .unwrap_or(0)
        })
    }

    fn find_voice(&mut self, tag: VoiceTag) -> Option<&mut Voice> {
        self.voices
            .iter_mut()
            .find(|v| v.tag() == tag && !v.is_free())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> VoiceSpec {
        VoiceSpec {
            frequency: 220.0,
            waveforms: [OscillatorWaveform::Sawtooth, OscillatorWaveform::Square],
            detune_cents: [0.0, 7.0],
            gains: [0.56, 0.24],
            second_oscillator: true,
        }
    }

    #[test]
    fn note_on_then_off_frees_the_voice() {
        let mut poly = PolySynth::new(48_000.0);
        let mut out = vec![0.0f32; 256];

        poly.handle(&SynthMessage::NoteOn { tag: 1, spec: spec() });
        poly.render_block(&mut out);
        assert_eq!(poly.active_count(), 1);
        assert!(out.iter().any(|&s| s != 0.0));

        poly.handle(&SynthMessage::NoteOff { tag: 1 });
        out.fill(0.0);
        poly.render_block(&mut out);
        assert_eq!(poly.active_count(), 0);
    }

    #[test]
    fn full_pool_steals_oldest_releasing_voice() {
        let mut poly = PolySynth::new(48_000.0);
        let mut out = vec![0.0f32; 16];
        for tag in 0..VOICE_POOL_SIZE as u64 {
            poly.handle(&SynthMessage::NoteOn { tag, spec: spec() });
            poly.render_block(&mut out);
        }
        poly.handle(&SynthMessage::NoteOff { tag: 3 });
        poly.handle(&SynthMessage::NoteOff { tag: 5 });

        poly.handle(&SynthMessage::NoteOn { tag: 100, spec: spec() });
        let tags: Vec<_> = poly.voices().iter().map(|v| v.tag()).collect();
        assert!(tags.contains(&100));
        assert!(!tags.contains(&3));
        assert!(tags.contains(&5));
    }

    #[test]
    fn panic_frees_immediately() {
        let mut poly = PolySynth::new(48_000.0);
        poly.handle(&SynthMessage::NoteOn { tag: 1, spec: spec() });
        poly.handle(&SynthMessage::NoteOn { tag: 2, spec: spec() });
        poly.handle(&SynthMessage::Panic);
        assert_eq!(poly.active_count(), 0);
    }

    #[test]
    fn unrelated_messages_are_passed_over() {
        let mut poly = PolySynth::new(48_000.0);
        assert!(!poly.handle(&SynthMessage::TriggerDrum { row: 0 }));
    }
}
