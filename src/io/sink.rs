use crate::engine::AudioProcessor;
use crate::error::SinkError;

/// An audio output that drives an [`AudioProcessor`].
///
/// The engine asks the sink for its format, builds a processor to match and
/// hands it over with [`start`](AudioSink::start). From then on the sink
/// owns the processor and calls [`AudioProcessor::process`] whenever it
/// needs samples.
pub trait AudioSink {
    fn sample_rate(&self) -> u32;

    fn channels(&self) -> u16;

    fn start(&mut self, processor: AudioProcessor) -> Result<(), SinkError>;
}
