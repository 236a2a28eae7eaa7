use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

/*
Visualizer Ring
===============

The scope only ever needs the newest `window` samples, so it is a fixed ring
of atomics that the audio thread overwrites in place. There is no "full"
state: a slow UI frame just misses some history and still sees the latest
audio on its next poll.

    write pos ─┐
               ▼
    [ 5 6 7 8 1 2 3 4 ]   poll reads from write pos: 1 2 3 4 5 6 7 8

A poll that races a write may see a window that straddles two callbacks.
That is harmless for a display.
*/

struct ScopeShared {
    samples: Box<[AtomicU32]>,
    /// Total samples written; `written % len` is the next slot.
    written: AtomicUsize,
}

/// Build a visualizer tap keeping the latest `window` samples.
pub fn scope_tap(window: usize) -> (ScopeTap, ScopeReader) {
    let window = window.max(1);
    let shared = Arc::new(ScopeShared {
        samples: (0..window).map(|_| AtomicU32::new(0.0f32.to_bits())).collect(),
        written: AtomicUsize::new(0),
    });
    (
        ScopeTap {
            shared: shared.clone(),
        },
        ScopeReader {
            shared,
            window: vec![0.0; window],
        },
    )
}

/// Audio-thread end. Always overwrites the oldest samples.
pub struct ScopeTap {
    shared: Arc<ScopeShared>,
}

impl ScopeTap {
    pub fn write(&mut self, block: &[f32]) {
        let ring = &self.shared.samples;
        let len = ring.len();
        let start = self.shared.written.load(Ordering::Relaxed);
        // Older parts of an oversized block would be overwritten anyway.
        let skip = block.len().saturating_sub(len);
        for (i, &sample) in block.iter().enumerate().skip(skip) {
            ring[(start + i) % len].store(sample.to_bits(), Ordering::Relaxed);
        }
        self.shared
            .written
            .store(start.wrapping_add(block.len()), Ordering::Release);
    }
}

/// Read-only view of the most recent master output.
pub struct ScopeReader {
    shared: Arc<ScopeShared>,
    window: Vec<f32>,
}

impl ScopeReader {
    /// Copy out the latest window, oldest sample first.
    pub fn poll(&mut self) -> &[f32] {
        let ring = &self.shared.samples;
        let len = ring.len();
        let written = self.shared.written.load(Ordering::Acquire);
        for (i, slot) in self.window.iter_mut().enumerate() {
            *slot = f32::from_bits(ring[(written + i) % len].load(Ordering::Relaxed));
        }
        &self.window
    }

    pub fn window(&self) -> &[f32] {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_latest_window() {
        let (mut tap, mut reader) = scope_tap(4);
        tap.write(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(reader.poll(), &[3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn starts_silent() {
        let (_tap, mut reader) = scope_tap(8);
        assert_eq!(reader.poll(), &[0.0; 8]);
    }

    #[test]
    fn unpolled_writes_still_show_the_newest_audio() {
        let (mut tap, mut reader) = scope_tap(4);
        for block in 0..100 {
            tap.write(&[block as f32; 3]);
        }
        tap.write(&[7.0, 8.0]);
        assert_eq!(reader.poll(), &[99.0, 99.0, 7.0, 8.0]);
    }

    #[test]
    fn partial_blocks_wrap_in_order() {
        let (mut tap, mut reader) = scope_tap(3);
        tap.write(&[1.0, 2.0]);
        assert_eq!(reader.poll(), &[0.0, 1.0, 2.0]);
        tap.write(&[3.0, 4.0]);
        assert_eq!(reader.poll(), &[2.0, 3.0, 4.0]);
    }
}
