//! Benchmarks for the colored noise generators.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepsynth::dsp::noise::{NoiseColor, NoiseGenerator};

use crate::BLOCK_SIZES;

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for color in NoiseColor::ALL {
            let mut generator = NoiseGenerator::new(color, 42);
            let name = format!("{color:?}").to_lowercase();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = generator.next_sample();
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
