//! Reverb - room simulation via delay networks.
//!
//! Classic Schroeder layout: four parallel damped combs build a dense tail,
//! then two series allpasses diffuse it.
//!
//! ```text
//! Input ──┬──→ [Comb 29.7ms] ──┐
//!         ├──→ [Comb 37.1ms] ──┤
//!         ├──→ [Comb 41.1ms] ──┼──→ (+) ×¼ ──→ [Allpass 5.0ms] ──→ [Allpass 1.7ms] ──→ Output
//!         └──→ [Comb 43.7ms] ──┘
//! ```
//!
//! Comb: `y[n] = x[n] + fb · lp(y[n - d])`, where `lp` is a one-pole damping
//! filter inside the loop. Comb lengths have no common factors, so their
//! echoes never line up into a pitched ring.
//!
//! Allpass: `y[n] = -g · x[n] + x[n - d] + g · y[n - d]`. Flat magnitude,
//! smeared phase.
//!
//! Delay buffers are sized once from the sample rate at construction.

const COMB_DELAYS_MS: [f32; 4] = [29.7, 37.1, 41.1, 43.7];
const ALLPASS_DELAYS_MS: [f32; 2] = [5.0, 1.7];

fn ms_to_samples(ms: f32, sample_rate: f32) -> usize {
    ((ms * sample_rate / 1000.0) as usize).max(1)
}

pub struct CombFilter {
    buffer: Vec<f32>,
    write_pos: usize,
    feedback: f32,
    damp: f32,
    filter_state: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
            feedback: 0.5,
            damp: 0.5,
            filter_state: 0.0,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.write_pos];
        self.filter_state = output * (1.0 - self.damp) + self.filter_state * self.damp;
        self.buffer[self.write_pos] = input + self.filter_state * self.feedback;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.filter_state = 0.0;
        self.write_pos = 0;
    }
}

pub struct AllpassFilter {
    buffer: Vec<f32>,
    write_pos: usize,
    feedback: f32,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
            feedback: 0.5,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.9);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.write_pos];
        let output = -self.feedback * input + delayed;
        self.buffer[self.write_pos] = input + self.feedback * output;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

pub struct SchroederReverb {
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 2],
}

impl SchroederReverb {
    pub fn new(sample_rate: f32) -> Self {
        let combs = COMB_DELAYS_MS.map(|ms| CombFilter::new(ms_to_samples(ms, sample_rate)));
        let allpasses =
            ALLPASS_DELAYS_MS.map(|ms| AllpassFilter::new(ms_to_samples(ms, sample_rate)));
        let mut reverb = Self { combs, allpasses };
        reverb.set_room_size(0.5);
        reverb.set_damping(0.4);
        reverb
    }

    /// 0..1, mapped to comb feedback 0.7..0.98.
    pub fn set_room_size(&mut self, size: f32) {
        let feedback = 0.7 + size.clamp(0.0, 1.0) * 0.28;
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
        }
    }

    pub fn set_damping(&mut self, damp: f32) {
        for comb in &mut self.combs {
            comb.set_damp(damp);
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut output = 0.0;
        for comb in &mut self.combs {
            output += comb.process(input);
        }
        output *= 0.25;

        for allpass in &mut self.allpasses {
            output = allpass.process(output);
        }
        output
    }

    pub fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.reset();
        }
        for allpass in &mut self.allpasses {
            allpass.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comb_echoes_after_its_length() {
        let mut comb = CombFilter::new(10);
        comb.set_feedback(0.5);
        comb.set_damp(0.0);

        assert_eq!(comb.process(1.0), 0.0);
        for _ in 0..9 {
            comb.process(0.0);
        }
        assert!(comb.process(0.0) > 0.99);
    }

    #[test]
    fn impulse_leaves_a_tail() {
        let mut reverb = SchroederReverb::new(48_000.0);
        reverb.process(1.0);

        let tail = (0..5_000).map(|_| reverb.process(0.0)).any(|s| s.abs() > 1e-3);
        assert!(tail);
    }

    #[test]
    fn max_room_stays_stable() {
        let mut reverb = SchroederReverb::new(48_000.0);
        reverb.set_room_size(1.0);
        for _ in 0..20_000 {
            let out = reverb.process(0.1);
            assert!(out.is_finite() && out.abs() < 10.0, "unstable: {out}");
        }
    }
}
