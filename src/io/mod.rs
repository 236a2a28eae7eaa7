//! Where rendered audio goes: output devices, offline buffers and the
//! visualizer tap.

pub mod cpal_sink;
pub mod offline;
pub mod scope;
pub mod sink;

pub use cpal_sink::CpalSink;
pub use offline::OfflineSink;
pub use scope::{scope_tap, ScopeReader, ScopeTap};
pub use sink::AudioSink;
