use std::f32::consts::TAU;

/*
State-Variable Lowpass
======================

Topology-preserving (trapezoidal) SVF. Two integrators in a loop produce
lowpass, bandpass and highpass taps at once; only the lowpass tap feeds the
chain. Unlike a direct-form biquad, the cutoff can move every sample without
zipper noise or blow-ups, which is what the smoothed filter knob needs.

    g = tan(π · fc / fs)         pre-warped integrator gain
    k = 2 - 2·resonance          damping (2 = no resonance)

The one-pole lowpass below is a cheaper tone control for feedback paths
(the dub echo's darkening): each pass through the loop loses a little more
top end, so repeats get progressively duller.
*/

pub struct SVFilter {
    ic1eq: f32,
    ic2eq: f32,
    cutoff_hz: f32,
    resonance: f32,
}

impl SVFilter {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance: 0.0,
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(0.0, 0.95);
    }

    #[inline]
    fn coefficients(&self, sample_rate: f32) -> (f32, f32) {
        let nyquist_guard = sample_rate * 0.49;
        let fc = self.cutoff_hz.clamp(10.0, nyquist_guard);
        let g = (TAU * fc / (2.0 * sample_rate)).tan();
        let k = 2.0 - 2.0 * self.resonance;
        (g, k)
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, sample_rate: f32) -> f32 {
        let (g, k) = self.coefficients(sample_rate);
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

/// Single-pole lowpass: `y += a · (x - y)`.
pub struct OnePole {
    state: f32,
    coefficient: f32,
}

impl OnePole {
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            coefficient: 1.0,
        };
        filter.set_cutoff(cutoff_hz, sample_rate);
        filter
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32, sample_rate: f32) {
        let x = (-TAU * cutoff_hz.max(1.0) / sample_rate).exp();
        self.coefficient = 1.0 - x;
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> f32 {
        self.state += self.coefficient * (sample - self.state);
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorBlock;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        buffer[buffer.len() / 2..]
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn dc_passes_lowpass() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = vec![1.0; 512];
        filter.render(&mut buffer, 48_000.0);
        assert!(buffer[511] > 0.99, "got {}", buffer[511]);
    }

    #[test]
    fn lowpass_attenuates_above_cutoff() {
        let sample_rate = 48_000.0;
        let mut osc = OscillatorBlock::sine();
        let mut buffer = vec![0.0f32; 1024];
        osc.render(&mut buffer, 8_000.0, sample_rate);

        let mut filter = SVFilter::lowpass(800.0);
        filter.render(&mut buffer, sample_rate);

        // 10x above cutoff, 12 dB/octave
        assert!(peak_after_transient(&buffer) < 0.05);
    }

    #[test]
    fn one_pole_converges_to_input() {
        let mut filter = OnePole::new(1_000.0, 48_000.0);
        let mut last = 0.0;
        for _ in 0..2_000 {
            last = filter.next_sample(0.5);
        }
        assert!((last - 0.5).abs() < 1e-4);
    }

    #[test]
    fn cutoff_above_nyquist_stays_stable() {
        let mut filter = SVFilter::lowpass(60_000.0);
        let mut buffer = vec![0.5f32; 256];
        filter.render(&mut buffer, 48_000.0);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
