mod chain;
mod voices;

pub use chain::{bench_chain, bench_processor};
pub use voices::bench_voices;
