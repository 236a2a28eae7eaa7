use rtrb::Producer;

use crate::dsp::noise::NoiseColor;
use crate::dsp::oscillator::OscillatorWaveform;
use crate::params::OscSlot;

/// Identifies one audio-side voice for its whole life, release tail included.
///
/// Note names are not enough: a note can be struck again while its previous
/// voice is still fading out.
pub type VoiceTag = u64;

/// Everything the audio thread needs to start a voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSpec {
    pub frequency: f32,
    pub waveforms: [OscillatorWaveform; 2],
    pub detune_cents: [f32; 2],
    pub gains: [f32; 2],
    pub second_oscillator: bool,
}

/// Commands from the control thread to the audio thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynthMessage {
    NoteOn { tag: VoiceTag, spec: VoiceSpec },
    NoteOff { tag: VoiceTag },
    SetGains { tag: VoiceTag, gains: [f32; 2] },
    SetWaveform { slot: OscSlot, waveform: OscillatorWaveform },
    AllNotesOff,
    TriggerDrum { row: usize },
    NoiseStart(NoiseColor),
    NoiseStop(NoiseColor),
    /// Silence everything at once: voices, drums, noise and effect tails.
    Panic,
}

/// Where the control side sends its commands.
pub trait CommandSink {
    fn send(&mut self, message: SynthMessage);
}

impl CommandSink for Producer<SynthMessage> {
    fn send(&mut self, message: SynthMessage) {
        if self.push(message).is_err() {
            tracing::warn!(?message, "command queue full, dropping message");
        }
    }
}

/// Collects commands in order; handy for inspecting what would be sent.
impl CommandSink for Vec<SynthMessage> {
    fn send(&mut self, message: SynthMessage) {
        self.push(message);
    }
}
