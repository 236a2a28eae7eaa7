//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the keys it wants
//! to change:
//!
//! ```toml
//! tempo_bpm = 96.0
//! capture_channels = 1
//! ```

#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::ConfigError;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Rate of sinks built with `OfflineSink::from_config`. Device sinks
    /// report their own rate.
    pub sample_rate: u32,
    /// Initial melodic sequencer tempo.
    pub tempo_bpm: f64,
    /// Initial drum sequencer tempo.
    pub drum_tempo_bpm: f64,
    /// Slots in the control → audio command queue.
    pub command_capacity: usize,
    /// Samples kept by the visualizer tap.
    pub scope_window: usize,
    /// Channels written to captured recordings (1 or 2).
    pub capture_channels: u16,
    /// Capacity of the audio → capture ring, in seconds of audio.
    pub capture_ring_seconds: f32,
    /// Whether new voices get a second oscillator.
    pub second_oscillator: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            tempo_bpm: 120.0,
            drum_tempo_bpm: 120.0,
            command_capacity: 256,
            scope_window: 1024,
            capture_channels: 2,
            capture_ring_seconds: 2.0,
            second_oscillator: true,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Read a TOML config file.
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Read a config file if it exists, otherwise fall back to defaults.
    #[cfg(feature = "serde")]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Clamp values that would break the engine into usable ranges.
    pub fn sanitized(mut self) -> Self {
        self.sample_rate = self.sample_rate.clamp(8_000, 192_000);
        self.command_capacity = self.command_capacity.max(16);
        self.scope_window = self.scope_window.clamp(64, 16_384);
        self.capture_channels = self.capture_channels.clamp(1, 2);
        self.capture_ring_seconds = self.capture_ring_seconds.clamp(0.1, 30.0);
        self
    }
}
