//! Colored noise generators.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Colored Noise
=============

All three colors start from the same uniform white source and differ only in
how the spectrum is tilted:

  white   flat spectrum, every frequency band has equal energy
  pink    -3 dB/octave, equal energy per octave (sounds "balanced")
  brown   -6 dB/octave, a random walk (deep rumble, like surf)

Pink uses the Voss-McCartney algorithm: 16 rows of held random values, where
row k is refreshed every 2^k samples. Summing them gives a 1/f slope without
any filtering. The row to refresh is found from the trailing zeros of a
counter, so each sample touches at most a couple of rows on average.

Brown integrates white noise with a small step through a slightly leaky
integrator, so the walk drifts back toward zero instead of pinning against
the rails. The raw walk is quiet, so it is scaled back up on output.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseColor {
    White,
    Pink,
    Brown,
}

impl NoiseColor {
    pub const ALL: [NoiseColor; 3] = [NoiseColor::White, NoiseColor::Pink, NoiseColor::Brown];

    pub fn index(self) -> usize {
        self as usize
    }
}

const PINK_ROWS: usize = 16;
const BROWN_STEP: f32 = 0.02;
const BROWN_LEAK: f32 = 1.02;
const BROWN_GAIN: f32 = 3.5;

/// Allocation-free noise source; safe to run on the audio thread.
pub struct NoiseGenerator {
    color: NoiseColor,
    state: u32,
    pink_rows: [f32; PINK_ROWS],
    pink_index: u32,
    pink_sum: f32,
    brown: f32,
}

impl NoiseGenerator {
    pub fn new(color: NoiseColor, seed: u32) -> Self {
        Self {
            color,
            // xorshift must never hold zero
            state: seed.max(1),
            pink_rows: [0.0; PINK_ROWS],
            pink_index: 0,
            pink_sum: 0.0,
            brown: 0.0,
        }
    }

    pub fn white(seed: u32) -> Self {
        Self::new(NoiseColor::White, seed)
    }

    pub fn pink(seed: u32) -> Self {
        Self::new(NoiseColor::Pink, seed)
    }

    pub fn brown(seed: u32) -> Self {
        Self::new(NoiseColor::Brown, seed)
    }

    pub fn color(&self) -> NoiseColor {
        self.color
    }

    /// Uniform in [-1, 1).
    #[inline]
    fn white_sample(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }

    #[inline]
    fn pink_sample(&mut self) -> f32 {
        self.pink_index = self.pink_index.wrapping_add(1);
        let changed = self.pink_index ^ self.pink_index.wrapping_sub(1);
        for row in 0..PINK_ROWS {
            if changed & (1 << row) != 0 {
                let fresh = self.white_sample() / PINK_ROWS as f32;
                self.pink_sum += fresh - self.pink_rows[row];
                self.pink_rows[row] = fresh;
            }
        }
        let white = self.white_sample() / PINK_ROWS as f32;
        (self.pink_sum + white).clamp(-1.0, 1.0)
    }

    #[inline]
    fn brown_sample(&mut self) -> f32 {
        let white = self.white_sample();
        self.brown = (self.brown + white * BROWN_STEP) / BROWN_LEAK;
        (self.brown * BROWN_GAIN).clamp(-1.0, 1.0)
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match self.color {
            NoiseColor::White => self.white_sample(),
            NoiseColor::Pink => self.pink_sample(),
            NoiseColor::Brown => self.brown_sample(),
        }
    }

    /// Clear the filter memory (pink rows, brown walk). The random sequence continues.
    pub fn reset(&mut self) {
        self.pink_rows = [0.0; PINK_ROWS];
        self.pink_index = 0;
        self.pink_sum = 0.0;
        self.brown = 0.0;
    }
}
