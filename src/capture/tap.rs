use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

/// Build a capture ring holding `capacity` samples. `channels` controls how
/// many copies of each mono sample are written per frame.
pub fn capture_tap(capacity: usize, channels: u16) -> (CaptureTap, CaptureReader) {
    let (producer, consumer) = RingBuffer::new(capacity.max(1));
    let armed = Arc::new(AtomicBool::new(false));
    let dropped = Arc::new(AtomicU64::new(0));
    (
        CaptureTap {
            producer,
            armed: armed.clone(),
            dropped: dropped.clone(),
            channels: channels.clamp(1, 2) as usize,
        },
        CaptureReader {
            consumer,
            armed,
            dropped,
        },
    )
}

/// Audio-thread end of the capture ring.
pub struct CaptureTap {
    producer: Producer<f32>,
    armed: Arc<AtomicBool>,
    dropped: Arc<AtomicU64>,
    channels: usize,
}

impl CaptureTap {
    /// Copy a rendered mono block into the ring if recording is armed.
    /// A frame goes in whole or not at all; frames that do not fit are
    /// counted and dropped, so the ring never holds a partial frame.
    pub fn write(&mut self, block: &[f32]) {
        if !self.armed.load(Ordering::Acquire) {
            return;
        }
        let mut lost = 0u64;
        for &sample in block {
            if self.producer.slots() < self.channels {
                lost += 1;
                continue;
            }
            for _ in 0..self.channels {
                let _ = self.producer.push(sample);
            }
        }
        if lost > 0 {
            self.dropped.fetch_add(lost, Ordering::Relaxed);
        }
    }
}

/// Control-thread end of the capture ring.
pub struct CaptureReader {
    consumer: Consumer<f32>,
    armed: Arc<AtomicBool>,
    dropped: Arc<AtomicU64>,
}

impl CaptureReader {
    /// Discard stale samples and start recording.
    pub fn arm(&mut self) {
        self.discard();
        self.dropped.store(0, Ordering::Relaxed);
        self.armed.store(true, Ordering::Release);
    }

    pub fn disarm(&mut self) {
        self.armed.store(false, Ordering::Release);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Everything currently in the ring, or `None` if it is empty.
    pub fn take_chunk(&mut self) -> Option<Vec<f32>> {
        let available = self.consumer.slots();
        if available == 0 {
            return None;
        }
        let chunk = self.consumer.read_chunk(available).ok()?;
        let (first, second) = chunk.as_slices();
        let mut samples = Vec::with_capacity(available);
        samples.extend_from_slice(first);
        samples.extend_from_slice(second);
        chunk.commit_all();
        Some(samples)
    }

    pub fn discard(&mut self) {
        let available = self.consumer.slots();
        if let Ok(chunk) = self.consumer.read_chunk(available) {
            chunk.commit_all();
        }
    }

    /// Frames lost to a full ring since the last call.
    pub fn take_dropped(&self) -> u64 {
        self.dropped.swap(0, Ordering::Relaxed)
    }
}
