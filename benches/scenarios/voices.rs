//! Voice pool at full polyphony.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepsynth::dsp::oscillator::OscillatorWaveform;
use stepsynth::synth::message::{SynthMessage, VoiceSpec};
use stepsynth::synth::poly::PolySynth;
use stepsynth::{NoteId, MAX_POLYPHONY};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn spec(note: NoteId, second_oscillator: bool) -> VoiceSpec {
    VoiceSpec {
        frequency: note.frequency(3),
        waveforms: [OscillatorWaveform::Sawtooth, OscillatorWaveform::Square],
        detune_cents: [0.0, 7.0],
        gains: [0.56, 0.24],
        second_oscillator,
    }
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let chord = [NoteId::C, NoteId::E, NoteId::G, NoteId::B];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, second_oscillator) in [("four_single_osc", false), ("four_dual_osc", true)] {
            let mut poly = PolySynth::new(SAMPLE_RATE);
            for (tag, &note) in chord.iter().take(MAX_POLYPHONY).enumerate() {
                poly.handle(&SynthMessage::NoteOn {
                    tag: tag as u64,
                    spec: spec(note, second_oscillator),
                });
            }

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.fill(0.0);
                    poly.render_block(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
