//! Error taxonomy.
//!
//! Nothing here is process-fatal: every error is recovered at the component
//! boundary that produces it and handed back to the caller as a value.

use thiserror::Error;

use crate::synth::note::NoteId;

/// Why a note-on was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error("polyphony limit of {limit} voices reached")]
    CapacityExceeded { limit: usize },
    #[error("note {0} is already held")]
    AlreadyHeld(NoteId),
    #[error("unknown note name {0:?}")]
    UnknownNote(String),
}

/// The capture container could not be parsed back into PCM.
#[derive(Debug, Error)]
#[error("could not decode captured audio: {reason}")]
pub struct DecodeError {
    pub reason: String,
}

/// The decoded PCM could not be serialized as a 16-bit WAV file.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("16-bit PCM WAV supports 1 or 2 channels, got {0}")]
    UnsupportedChannels(u16),
    #[error("sample rate must be non-zero")]
    InvalidSampleRate,
    #[error("wav serialization failed: {0}")]
    Wav(#[from] hound::Error),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("audio output is not running yet")]
    DeviceUnavailable,
    #[error("no capture session is active")]
    NotRecording,
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("failed to write recording: {0}")]
    Io(#[from] std::io::Error),
}

/// The concrete output device could not be opened.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("no default output device available")]
    NoDevice,
    #[error("failed to fetch default output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("unsupported sample format {0:?} (only f32 output is supported)")]
    SampleFormat(cpal::SampleFormat),
    #[error("failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("sink was already started")]
    AlreadyStarted,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
