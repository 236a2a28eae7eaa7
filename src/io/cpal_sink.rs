use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::engine::AudioProcessor;
use crate::error::SinkError;
use crate::io::sink::AudioSink;

/// The system's default output device.
///
/// Only `f32` streams are supported. The stream lives as long as the sink,
/// so keep the sink alive for as long as audio should play.
pub struct CpalSink {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
    stream: Option<cpal::Stream>,
}

impl CpalSink {
    pub fn open_default() -> Result<Self, SinkError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(SinkError::NoDevice)?;
        let config = device.default_output_config()?;
        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(SinkError::SampleFormat(config.sample_format()));
        }
        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| String::from("unknown device"))
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }
}

impl AudioSink for CpalSink {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    fn channels(&self) -> u16 {
        self.config.channels()
    }

    fn start(&mut self, mut processor: AudioProcessor) -> Result<(), SinkError> {
        if self.stream.is_some() {
            return Err(SinkError::AlreadyStarted);
        }

        let channels = self.config.channels() as usize;
        let stream_config: cpal::StreamConfig = self.config.clone().into();
        let stream = self.device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                processor.process(data, channels);
            },
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )?;
        stream.play()?;

        tracing::info!(
            device = %self.device_name(),
            sample_rate = self.sample_rate(),
            channels,
            "audio output started"
        );
        self.stream = Some(stream);
        Ok(())
    }
}
