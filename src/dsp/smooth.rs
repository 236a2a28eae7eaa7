//! One-pole parameter smoothing.
//!
//! Parameter writes arrive once per control event, but the audio path reads
//! them every sample. Jumping straight to a new value produces zipper noise,
//! so each audio-side parameter glides toward its target:
//!
//! ```text
//! y[n] = target + (y[n-1] - target) · a,    a = exp(-1 / (τ · fs))
//! ```
//!
//! After τ seconds the remaining distance is ~37%, after 5τ it is under 1%.

/// Default glide time constant.
pub const SMOOTHING_MS: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coefficient: f32,
}

impl SmoothedParam {
    pub fn new(initial: f32, time_ms: f32, sample_rate: f32) -> Self {
        let samples = (time_ms / 1000.0 * sample_rate).max(1.0);
        Self {
            current: initial,
            target: initial,
            coefficient: (-1.0 / samples).exp(),
        }
    }

    pub fn with_default_time(initial: f32, sample_rate: f32) -> Self {
        Self::new(initial, SMOOTHING_MS, sample_rate)
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    /// Jump to `value` with no glide.
    pub fn snap(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    #[inline]
    pub fn next(&mut self) -> f32 {
        self.current = self.target + (self.current - self.target) * self.coefficient;
        if (self.current - self.target).abs() < 1e-6 {
            self.current = self.target;
        }
        self.current
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}
