use crate::params::ParamChange;
use crate::sequencing::{DrumHits, StepAction};

/// Who caused an engine event.
///
/// Write capture listens to performance events only, so playback never
/// records over the pattern it is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Live input: keys, knobs, the randomizer.
    Performance,
    /// Step sequencer playback.
    Sequencer,
}

/// A single parameter mutation on its way through the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamChanged {
    pub change: ParamChange,
    pub origin: Origin,
}

impl ParamChanged {
    pub fn new(change: ParamChange, origin: Origin) -> Self {
        Self { change, origin }
    }
}

/// What [`AudioEngine::tick`](super::AudioEngine::tick) did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub melodic: Option<StepAction>,
    pub drums: Option<DrumHits>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.melodic.is_none() && self.drums.is_none()
    }
}
