//! Control-rate oscillator for the stutter (tremolo) stage.

use std::f32::consts::TAU;

/*
Tremolo
=======

The stutter stage is amplitude modulation by a sub-audio sine:

    gain(t) = 1 - depth · unipolar(lfo(t))

    depth 0     gain stays at 1 (no effect)
    depth 1     gain swings all the way to 0 once per LFO cycle

Rates run 1-32 Hz. Below ~7 Hz it reads as a pulse; toward 32 Hz it
becomes a choppy flutter, just shy of audio-rate AM sidebands.

The LFO is free-running: its phase is never reset by notes, so the pulse
keeps its place in time when new voices come in.
*/

/// Map a bipolar value (-1..1) to unipolar (0..1).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

#[derive(Debug, Clone, Default)]
pub struct Lfo {
    phase: f32,
}

impl Lfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bipolar sine, advancing by `rate_hz / sample_rate` cycles.
    #[inline]
    pub fn next_sample(&mut self, rate_hz: f32, sample_rate: f32) -> f32 {
        let value = (TAU * self.phase).sin();
        self.phase += rate_hz / sample_rate;
        self.phase -= self.phase.floor();
        value
    }

    /// Tremolo gain in [1 - depth, 1].
    #[inline]
    pub fn tremolo_gain(&mut self, depth: f32, rate_hz: f32, sample_rate: f32) -> f32 {
        let lfo = bipolar_to_unipolar(self.next_sample(rate_hz, sample_rate));
        1.0 - depth.clamp(0.0, 1.0) * lfo
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bipolar_maps_to_unit_range() {
        assert_eq!(bipolar_to_unipolar(-1.0), 0.0);
        assert_eq!(bipolar_to_unipolar(0.0), 0.5);
        assert_eq!(bipolar_to_unipolar(1.0), 1.0);
    }

    #[test]
    fn zero_depth_is_unity_gain() {
        let mut lfo = Lfo::new();
        for _ in 0..1_000 {
            assert_eq!(lfo.tremolo_gain(0.0, 8.0, 48_000.0), 1.0);
        }
    }

    #[test]
    fn full_depth_reaches_silence_once_per_cycle() {
        let mut lfo = Lfo::new();
        let gains: Vec<f32> = (0..48_000).map(|_| lfo.tremolo_gain(1.0, 4.0, 48_000.0)).collect();
        let min = gains.iter().cloned().fold(f32::MAX, f32::min);
        let max = gains.iter().cloned().fold(f32::MIN, f32::max);
        assert!(min < 1e-3, "min {min}");
        assert!(max > 0.999, "max {max}");
    }
}
