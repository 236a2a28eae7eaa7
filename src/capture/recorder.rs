use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::capture::wav::{decode_container, encode_container, encode_wav, PcmBuffer};
use crate::error::{CaptureError, DecodeError, EncodeError};

/// One recording in progress: raw float chunks as they came off the ring.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    sample_rate: u32,
    channels: u16,
    chunks: Vec<Vec<f32>>,
}

impl CaptureSession {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels: channels.clamp(1, 2),
            chunks: Vec::new(),
        }
    }

    pub fn push_chunk(&mut self, chunk: Vec<f32>) {
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn frames(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum::<usize>() / self.channels as usize
    }

    /// Join the chunks into one float WAV image. A trailing partial frame
    /// is left out. The session is untouched, so a failed attempt can be
    /// retried or its chunks recovered with [`into_chunks`](Self::into_chunks).
    pub fn finalize(&self) -> Result<Vec<u8>, EncodeError> {
        Ok(encode_container(
            self.sample_rate,
            self.channels,
            &self.chunks,
        )?)
    }

    /// The raw interleaved chunks, in recording order.
    pub fn into_chunks(self) -> Vec<Vec<f32>> {
        self.chunks
    }
}

/// A finished take.
#[derive(Debug, Clone)]
pub struct CaptureRecording {
    pub pcm: PcmBuffer,
    /// The 16-bit WAV file, ready to write.
    pub wav: Vec<u8>,
}

impl CaptureRecording {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CaptureError> {
        std::fs::write(path.as_ref(), &self.wav)?;
        tracing::info!(path = %path.as_ref().display(), bytes = self.wav.len(), "recording saved");
        Ok(())
    }

    pub fn duration_secs(&self) -> f32 {
        self.pcm.duration_secs()
    }
}

/// What a background capture job produced.
#[derive(Debug)]
pub enum CaptureOutcome {
    Finished(CaptureRecording),
    /// The container could not be parsed; its raw bytes are handed back.
    DecodeFailed {
        error: DecodeError,
        container: Vec<u8>,
    },
    /// Decoding worked but the WAV could not be written. No file exists.
    EncodeFailed(EncodeError),
}

/// Decode a container and serialize it as a 16-bit WAV.
pub fn finish_capture(container: Vec<u8>) -> CaptureOutcome {
    let pcm = match decode_container(&container) {
        Ok(pcm) => pcm,
        Err(error) => return CaptureOutcome::DecodeFailed { error, container },
    };
    match encode_wav(&pcm) {
        Ok(wav) => CaptureOutcome::Finished(CaptureRecording { pcm, wav }),
        Err(error) => CaptureOutcome::EncodeFailed(error),
    }
}

/// Runs [`finish_capture`] off the control thread, one thread per take.
pub struct CaptureWorker {
    tx: Sender<CaptureOutcome>,
    rx: Receiver<CaptureOutcome>,
    pending: usize,
}

impl CaptureWorker {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx, pending: 0 }
    }

    pub fn submit(&mut self, container: Vec<u8>) {
        let tx = self.tx.clone();
        self.pending += 1;
        thread::spawn(move || {
            let outcome = finish_capture(container);
            // The receiver only goes away with the engine.
            let _ = tx.send(outcome);
        });
    }

    /// Non-blocking: the next finished job, if any.
    pub fn poll(&mut self) -> Option<CaptureOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => {
                self.pending = self.pending.saturating_sub(1);
                Some(outcome)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the next job finishes. `None` if nothing is pending.
    pub fn wait(&mut self) -> Option<CaptureOutcome> {
        if self.pending == 0 {
            return None;
        }
        let outcome = self.rx.recv().ok()?;
        self.pending -= 1;
        Some(outcome)
    }

    pub fn pending(&self) -> usize {
        self.pending
    }
}

impl Default for CaptureWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_tone(frames: usize) -> CaptureSession {
        let mut session = CaptureSession::new(8_000, 1);
        let tone: Vec<f32> = (0..frames)
            .map(|n| (n as f32 * 0.1).sin() * 0.5)
            .collect();
        for chunk in tone.chunks(100) {
            session.push_chunk(chunk.to_vec());
        }
        session
    }

    #[test]
    fn chunks_join_in_order() {
        let session = session_with_tone(250);
        assert_eq!(session.chunk_count(), 3);
        assert_eq!(session.frames(), 250);
        let container = session.finalize().unwrap();
        let pcm = decode_container(&container).unwrap();
        assert_eq!(pcm.samples.len(), 250);
        assert!((pcm.samples[101] - (101.0f32 * 0.1).sin() * 0.5).abs() < 1e-6);
    }

    #[test]
    fn odd_sample_count_still_finalizes_whole_frames() {
        let mut session = CaptureSession::new(48_000, 2);
        session.push_chunk(vec![0.1, 0.1, 0.2]);
        let container = session.finalize().expect("partial frame is dropped");
        let pcm = decode_container(&container).unwrap();
        assert_eq!(pcm.channels, 2);
        assert_eq!(pcm.samples, vec![0.1, 0.1]);
        assert_eq!(session.into_chunks(), vec![vec![0.1, 0.1, 0.2]]);
    }

    #[test]
    fn finished_take_is_a_wav() {
        let container = session_with_tone(800).finalize().unwrap();
        match finish_capture(container) {
            CaptureOutcome::Finished(recording) => {
                assert_eq!(&recording.wav[0..4], b"RIFF");
                assert_eq!(recording.pcm.frames(), 800);
                assert!((recording.duration_secs() - 0.1).abs() < 1e-6);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn broken_container_comes_back_raw() {
        let junk = b"RIFF....not really".to_vec();
        match finish_capture(junk.clone()) {
            CaptureOutcome::DecodeFailed { container, .. } => assert_eq!(container, junk),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn worker_delivers_through_channel() {
        let mut worker = CaptureWorker::new();
        worker.submit(session_with_tone(100).finalize().unwrap());
        assert_eq!(worker.pending(), 1);
        let outcome = worker.wait().expect("job result");
        assert!(matches!(outcome, CaptureOutcome::Finished(_)));
        assert_eq!(worker.pending(), 0);
        assert!(worker.poll().is_none());
    }
}
