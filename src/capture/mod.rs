//! Live recording of the master output.
//!
//! The audio thread copies each rendered block into a [`CaptureTap`] while
//! recording is armed. The control side drains the ring into a
//! [`CaptureSession`], and on stop hands the finished take to a background
//! worker that decodes it and serializes a 16-bit WAV file.

pub mod recorder;
pub mod tap;
pub mod wav;

pub use recorder::{CaptureOutcome, CaptureRecording, CaptureSession, CaptureWorker};
pub use tap::{capture_tap, CaptureReader, CaptureTap};
pub use wav::{encode_wav, PcmBuffer};
