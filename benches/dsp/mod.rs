mod effects;
mod filter;
mod noise;
mod oscillator;

pub use effects::bench_effects;
pub use filter::bench_filter;
pub use noise::bench_noise;
pub use oscillator::bench_oscillator;
