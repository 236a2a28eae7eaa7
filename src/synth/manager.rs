//! Control-side voice bookkeeping.
//!
//! The [`VoiceManager`] owns the held-note records and decides what the
//! audio thread should do; it never touches audio itself. Every decision is
//! sent as a [`SynthMessage`] through a [`CommandSink`].

use crate::dsp::mix::crossfade_gains;
use crate::dsp::oscillator::OscillatorWaveform;
use crate::error::VoiceError;
use crate::params::{OscSlot, SignalGraphParams};
use crate::synth::message::{CommandSink, SynthMessage, VoiceSpec, VoiceTag};
use crate::synth::note::NoteId;
use crate::MAX_POLYPHONY;

/// Velocity used when the caller has none (0-100 scale).
pub const DEFAULT_VELOCITY: u8 = 80;
pub const MAX_VELOCITY: u8 = 100;

/// One oscillator of a held voice, as configured when the note started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubVoice {
    pub waveform: OscillatorWaveform,
    pub detune_cents: f32,
}

/// A held note.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub tag: VoiceTag,
    pub note: NoteId,
    pub octave: i32,
    pub frequency: f32,
    pub velocity: u8,
    pub primary: SubVoice,
    /// `None` when the second oscillator was disabled at note-on.
    pub secondary: Option<SubVoice>,
    /// `[g1, g2]`; their sum is the voice output gain.
    pub gains: [f32; 2],
}

impl Voice {
    pub fn output_gain(&self) -> f32 {
        self.gains[0] + self.gains[1]
    }
}

/// Oscillator settings that new voices are built from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OscillatorSetup {
    waveforms: [OscillatorWaveform; 2],
    detune_cents: [f32; 2],
    mix: f32,
    second_oscillator: bool,
}

pub struct VoiceManager {
    held: Vec<Voice>,
    setup: OscillatorSetup,
    next_tag: VoiceTag,
}

impl VoiceManager {
    pub fn new(params: &SignalGraphParams) -> Self {
        Self {
            held: Vec::with_capacity(MAX_POLYPHONY),
            setup: OscillatorSetup {
                waveforms: [params.waveform1, params.waveform2],
                detune_cents: [params.detune1, params.detune2],
                mix: params.osc_mix,
                second_oscillator: params.second_oscillator,
            },
            next_tag: 1,
        }
    }

    /// Start `note` at `octave`. Velocity is on a 0-100 scale.
    pub fn note_on(
        &mut self,
        note: NoteId,
        octave: i32,
        velocity: u8,
        sink: &mut impl CommandSink,
    ) -> Result<&Voice, VoiceError> {
        if self.is_held(note) {
            return Err(VoiceError::AlreadyHeld(note));
        }
        if self.held.len() >= MAX_POLYPHONY {
            return Err(VoiceError::CapacityExceeded {
                limit: MAX_POLYPHONY,
            });
        }

        let velocity = velocity.min(MAX_VELOCITY);
        let frequency = note.frequency(octave);
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(VoiceError::UnknownNote(format!("{note}{octave}")));
        }

        let level = velocity as f32 / MAX_VELOCITY as f32;
        let (g1, g2) = crossfade_gains(self.setup.mix, level);
        let setup = self.setup;

        let voice = Voice {
            tag: self.next_tag,
            note,
            octave,
            frequency,
            velocity,
            primary: SubVoice {
                waveform: setup.waveforms[0],
                detune_cents: setup.detune_cents[0],
            },
            secondary: setup.second_oscillator.then_some(SubVoice {
                waveform: setup.waveforms[1],
                detune_cents: setup.detune_cents[1],
            }),
            gains: [g1, g2],
        };
        self.next_tag += 1;

        sink.send(SynthMessage::NoteOn {
            tag: voice.tag,
            spec: VoiceSpec {
                frequency,
                waveforms: setup.waveforms,
                detune_cents: setup.detune_cents,
                gains: voice.gains,
                second_oscillator: setup.second_oscillator,
            },
        });

        self.held.push(voice);
        Ok(&self.held[self.held.len() - 1])
    }

    /// Parse `name` and start it; an unparsable name is `UnknownNote`.
    pub fn note_on_named(
        &mut self,
        name: &str,
        octave: i32,
        velocity: u8,
        sink: &mut impl CommandSink,
    ) -> Result<&Voice, VoiceError> {
        let note: NoteId = name.parse()?;
        self.note_on(note, octave, velocity, sink)
    }

    /// Release `note` if held. Returns the released voice.
    pub fn note_off(&mut self, note: NoteId, sink: &mut impl CommandSink) -> Option<Voice> {
        let index = self.held.iter().position(|v| v.note == note)?;
        let voice = self.held.remove(index);
        sink.send(SynthMessage::NoteOff { tag: voice.tag });
        Some(voice)
    }

    /// Release every held note.
    pub fn all_notes_off(&mut self, sink: &mut impl CommandSink) -> usize {
        let released = self.held.len();
        self.held.clear();
        sink.send(SynthMessage::AllNotesOff);
        released
    }

    /// Retype every held voice's oscillator live, and use it for new voices.
    pub fn set_waveform(
        &mut self,
        slot: OscSlot,
        waveform: OscillatorWaveform,
        sink: &mut impl CommandSink,
    ) {
        match slot {
            OscSlot::Primary => {
                self.setup.waveforms[0] = waveform;
                for voice in &mut self.held {
                    voice.primary.waveform = waveform;
                }
            }
            OscSlot::Secondary => {
                self.setup.waveforms[1] = waveform;
                for voice in &mut self.held {
                    if let Some(secondary) = voice.secondary.as_mut() {
                        secondary.waveform = waveform;
                    }
                }
            }
        }
        sink.send(SynthMessage::SetWaveform { slot, waveform });
    }

    /// Rebalance every held voice from its current output gain.
    pub fn set_mix(&mut self, mix: f32, sink: &mut impl CommandSink) {
        let mix = mix.clamp(0.0, 1.0);
        self.setup.mix = mix;
        for voice in &mut self.held {
            let (g1, g2) = crossfade_gains(mix, voice.output_gain());
            voice.gains = [g1, g2];
            sink.send(SynthMessage::SetGains {
                tag: voice.tag,
                gains: voice.gains,
            });
        }
    }

    /// Applies to voices started afterwards only.
    pub fn set_detune(&mut self, slot: OscSlot, cents: f32) {
        match slot {
            OscSlot::Primary => self.setup.detune_cents[0] = cents,
            OscSlot::Secondary => self.setup.detune_cents[1] = cents,
        }
    }

    /// Applies to voices started afterwards only.
    pub fn set_second_oscillator(&mut self, enabled: bool) {
        self.setup.second_oscillator = enabled;
    }

    pub fn is_held(&self, note: NoteId) -> bool {
        self.held.iter().any(|v| v.note == note)
    }

    pub fn held(&self) -> &[Voice] {
        &self.held
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    /// The held voice, if exactly one note is down.
    pub fn single_held(&self) -> Option<&Voice> {
        match self.held.as_slice() {
            [voice] => Some(voice),
            _ => None,
        }
    }
}
