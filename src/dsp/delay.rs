use crate::MAX_DELAY_SAMPLES;

/*
Circular Delay Line
===================

A ring buffer that remembers the last N samples. Writing advances the head;
reading looks back a number of samples from the head:

    buffer  [ . . . . x . . . . . . h . . ]
                      ^             ^
                      read          write head
                      └── delay ───┘

Fractional delays (used by the pitch shifter, whose taps sweep
continuously) linearly interpolate between the two neighbouring samples.
Integer reads are used by the fixed echo stages.
*/

pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    pub fn new() -> Self {
        Self::with_capacity(MAX_DELAY_SAMPLES)
    }

    /// Allocate a line able to look back `capacity - 1` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(2)],
            write_pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Push one sample at the head.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Sample written `delay_samples` writes ago (1 = most recent).
    #[inline]
    pub fn read(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(1, len - 1);
        self.buffer[(self.write_pos + len - delay) % len]
    }

    /// Linear interpolation between neighbouring integer reads.
    #[inline]
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let max = (self.buffer.len() - 2) as f32;
        let delay = delay_samples.clamp(1.0, max);
        let whole = delay.floor();
        let frac = delay - whole;
        let a = self.read(whole as usize);
        let b = self.read(whole as usize + 1);
        a + (b - a) * frac
    }

    /// Read the delayed sample, then write `sample`.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, delay_samples: usize) -> f32 {
        let delayed = self.read(delay_samples);
        self.write(sample);
        delayed
    }

    pub fn render(&mut self, buffer: &mut [f32], delay_samples: usize) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, delay_samples);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_comes_back_after_delay() {
        let mut line = DelayLine::with_capacity(64);
        let mut buffer = vec![0.0f32; 32];
        buffer[0] = 1.0;
        line.render(&mut buffer, 10);

        assert_eq!(buffer[10], 1.0);
        assert_eq!(buffer.iter().filter(|&&s| s != 0.0).count(), 1);
    }

    #[test]
    fn read_one_is_latest_write() {
        let mut line = DelayLine::with_capacity(8);
        line.write(0.25);
        line.write(0.5);
        assert_eq!(line.read(1), 0.5);
        assert_eq!(line.read(2), 0.25);
    }

    #[test]
    fn interpolated_read_sits_between_samples() {
        let mut line = DelayLine::with_capacity(16);
        line.write(1.0);
        line.write(0.0);
        // delay 1 -> 0.0, delay 2 -> 1.0
        assert!((line.read_interpolated(1.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn oversized_delay_is_clamped() {
        let mut line = DelayLine::with_capacity(8);
        for i in 0..8 {
            line.write(i as f32);
        }
        assert!(line.read(1_000).is_finite());
        assert!(line.read_interpolated(1_000.0).is_finite());
    }
}
