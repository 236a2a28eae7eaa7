//! The complete effect chain and the audio callback around it.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepsynth::drums::SynthKit;
use stepsynth::graph::chain::SignalChain;
use stepsynth::io::OfflineSink;
use stepsynth::params::{ParamSlots, SignalGraphParams};
use stepsynth::{AudioEngine, EngineConfig, NoteId};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

/// Every stage engaged.
fn busy_patch() -> SignalGraphParams {
    SignalGraphParams {
        pink_noise: 0.05,
        reverb: 40.0,
        delay: 30.0,
        filter: 60.0,
        distortion: 30.0,
        dub: 20.0,
        stutter_depth: 0.5,
        stutter_rate: 6.0,
        pitch_shift: 5.0,
        compressor_threshold: -18.0,
        ..SignalGraphParams::default()
    }
}

pub fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/chain");
    let slots = ParamSlots::new(&busy_patch());

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.03).sin() * 0.5)
            .collect();
        let mut buffer = input.clone();

        let mut chain = SignalChain::new(SAMPLE_RATE);
        chain.update_from(&slots);
        group.bench_with_input(BenchmarkId::new("busy", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                chain.update_from(&slots);
                chain.process(black_box(&mut buffer));
            })
        });

        let idle = ParamSlots::default();
        let mut chain = SignalChain::new(SAMPLE_RATE);
        chain.update_from(&idle);
        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                chain.update_from(&idle);
                chain.process(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

/// Stereo callback with four voices and the busy patch.
pub fn bench_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/processor");

    for &size in BLOCK_SIZES {
        let mut engine = AudioEngine::new(EngineConfig::default(), SynthKit::new());
        let mut sink = OfflineSink::new(SAMPLE_RATE as u32, 2);
        if engine.attach(&mut sink).is_err() {
            continue;
        }
        engine.apply_snapshot(&busy_patch(), stepsynth::Origin::Performance);
        for note in [NoteId::C, NoteId::E, NoteId::G, NoteId::B] {
            let _ = engine.note_on(note, 3, 80);
        }
        engine.trigger_drum(0);

        let mut out = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("stereo", size), &size, |b, _| {
            b.iter(|| {
                sink.render_into(black_box(&mut out));
            })
        });
    }

    group.finish();
}
