//! Delay-line pitch shifter.

use std::f32::consts::PI;

use crate::dsp::delay::DelayLine;

/*
Dual-Tap Pitch Shifting
=======================

Reading a delay line with a moving read head changes pitch: if the delay
shrinks by (ratio - 1) samples per output sample, the head moves through
the buffer at `ratio` times real speed.

    ratio = 2^(semitones / 12)

A shrinking delay eventually hits zero and must jump back to the full
window, which would click. Two taps half a window apart solve that: each
tap is faded out by a sine window right where it jumps, while the other
tap is at full level.

    phase   0 ────────────── 0.5 ────────────── 1 (wrap)
    tap A   silent ──↗ loud ──↘ silent           (jumps here, inaudible)
    tap B   loud ──↘ silent (jumps) ──↗ loud

sin² + cos² = 1, so the pair keeps constant power through the crossfade.
At 0 semitones the stage is a plain bypass.
*/

/// Grain window length.
pub const WINDOW_MS: f32 = 50.0;

pub struct PitchShifter {
    line: DelayLine,
    window: f32,
    phase: f32,
}

impl PitchShifter {
    pub fn new(sample_rate: f32) -> Self {
        let window = (WINDOW_MS * sample_rate / 1000.0).max(16.0);
        Self {
            line: DelayLine::with_capacity(window as usize + 4),
            window,
            phase: 0.0,
        }
    }

    #[inline]
    pub fn ratio(semitones: f32) -> f32 {
        2.0_f32.powf(semitones / 12.0)
    }

    #[inline]
    pub fn process(&mut self, input: f32, semitones: f32) -> f32 {
        self.line.write(input);
        if semitones.abs() < 0.01 {
            return input;
        }

        let ratio = Self::ratio(semitones);
        self.phase -= (ratio - 1.0) / self.window;
        self.phase -= self.phase.floor();

        let phase_b = (self.phase + 0.5).fract();
        let tap_a = self.line.read_interpolated(1.0 + self.phase * self.window);
        let tap_b = self.line.read_interpolated(1.0 + phase_b * self.window);

        tap_a * (PI * self.phase).sin() + tap_b * (PI * phase_b).sin()
    }

    pub fn reset(&mut self) {
        self.line.reset();
        self.phase = 0.0;
    }
}
