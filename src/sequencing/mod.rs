//! The melodic and drum sequencers and the clock they share.

pub mod clock;
pub mod drum;
pub mod step;

pub use clock::{StepClock, Tick};
pub use drum::{DrumHits, DrumPattern, DrumSequencer};
pub use step::{CaptureEvent, StepAction, StepNote, StepSequencer, StepSlot};
