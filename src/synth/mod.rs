//! Voices: control-side bookkeeping and the audio-side pool.
//!
//! `manager` decides (polyphony cap, held notes, gains); `poly` and `voice`
//! render. They only ever talk through `message::SynthMessage`.

pub mod manager;
pub mod message;
pub mod note;
pub mod poly;
pub mod voice;
