use crate::config::EngineConfig;
use crate::engine::AudioProcessor;
use crate::error::SinkError;
use crate::io::sink::AudioSink;

/// Frames pulled per `process` call, like a device callback would.
pub const OFFLINE_BLOCK_FRAMES: usize = 512;

/// Pull-rendering sink: audio is produced only when [`render`](Self::render)
/// asks for it. Used for tests and offline bounces.
pub struct OfflineSink {
    sample_rate: u32,
    channels: u16,
    processor: Option<AudioProcessor>,
}

impl OfflineSink {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels: channels.max(1),
            processor: None,
        }
    }

    /// A sink running at the configured `sample_rate`.
    pub fn from_config(config: &EngineConfig, channels: u16) -> Self {
        Self::new(config.clone().sanitized().sample_rate, channels)
    }

    pub fn is_started(&self) -> bool {
        self.processor.is_some()
    }

    /// Render `frames` interleaved frames. Silence until started.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; frames * self.channels as usize];
        self.render_into(&mut out);
        out
    }

    pub fn render_into(&mut self, out: &mut [f32]) {
        let channels = self.channels as usize;
        let Some(processor) = self.processor.as_mut() else {
            out.fill(0.0);
            return;
        };
        for block in out.chunks_mut(OFFLINE_BLOCK_FRAMES * channels) {
            processor.process(block, channels);
        }
    }

    /// Render `seconds` of audio and keep only the first channel.
    pub fn render_mono_secs(&mut self, seconds: f32) -> Vec<f32> {
        let frames = (seconds * self.sample_rate as f32).round() as usize;
        self.render(frames)
            .chunks(self.channels as usize)
            .map(|frame| frame[0])
            .collect()
    }
}

impl AudioSink for OfflineSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn start(&mut self, processor: AudioProcessor) -> Result<(), SinkError> {
        if self.processor.is_some() {
            return Err(SinkError::AlreadyStarted);
        }
        self.processor = Some(processor);
        Ok(())
    }
}
