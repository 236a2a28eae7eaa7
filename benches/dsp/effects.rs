//! Benchmarks for the individual signal chain stages, each at a setting
//! where it actually does work (not bypassed).

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepsynth::graph::{
    compressor::{CompressorNode, CompressorParam},
    delay::{EchoNode, EchoParam},
    distortion::{DistortionNode, DistortionParam},
    node::{GraphNode, Modulatable, RenderCtx},
    pitch::{PitchNode, PitchParam},
    reverb::{ReverbNode, ReverbParam},
    tremolo::{StutterNode, StutterParam},
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn bench_stage<N: GraphNode>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    name: &str,
    size: usize,
    input: &[f32],
    node: &mut N,
) {
    let ctx = RenderCtx::new(SAMPLE_RATE);
    let mut buffer = input.to_vec();
    group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
        b.iter(|| {
            buffer.copy_from_slice(input);
            node.render_block(black_box(&mut buffer), black_box(&ctx));
        })
    });
}

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("effects");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.05).sin() * 0.8)
            .collect();

        let mut stutter = StutterNode::new(SAMPLE_RATE);
        stutter.set_param(StutterParam::Depth, 0.8);
        stutter.set_param(StutterParam::Rate, 8.0);
        bench_stage(&mut group, "stutter", size, &input, &mut stutter);

        let mut distortion = DistortionNode::new(SAMPLE_RATE);
        distortion.set_param(DistortionParam::Amount, 60.0);
        bench_stage(&mut group, "distortion", size, &input, &mut distortion);

        let mut delay = EchoNode::delay(SAMPLE_RATE);
        delay.set_param(EchoParam::Amount, 50.0);
        bench_stage(&mut group, "delay", size, &input, &mut delay);

        let mut dub = EchoNode::dub(SAMPLE_RATE);
        dub.set_param(EchoParam::Amount, 50.0);
        bench_stage(&mut group, "dub", size, &input, &mut dub);

        let mut reverb = ReverbNode::new(SAMPLE_RATE);
        reverb.set_param(ReverbParam::Amount, 50.0);
        bench_stage(&mut group, "reverb", size, &input, &mut reverb);

        let mut pitch = PitchNode::new(SAMPLE_RATE);
        pitch.set_param(PitchParam::Semitones, 7.0);
        bench_stage(&mut group, "pitch", size, &input, &mut pitch);

        let mut compressor = CompressorNode::new(SAMPLE_RATE);
        compressor.set_param(CompressorParam::Threshold, -24.0);
        bench_stage(&mut group, "compressor", size, &input, &mut compressor);
    }

    group.finish();
}
