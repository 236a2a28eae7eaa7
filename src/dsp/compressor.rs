//! Feed-forward compressor with a soft knee.

/*
Gain Computer
=============

The detector follows the signal's peak level with separate attack and
release times. That level (in dB) goes through a static curve:

    out dB
      │                 ╱ 1:1 (below threshold)
      │              ╱
      │           ╱ ·  ·  ·  ·  1:ratio (above threshold)
      │        ╱ ·
      │     ╱ (knee: quadratic blend over `knee` dB)
      └──────────────────────────── in dB
              threshold

    below  T - W/2       gain = 0
    inside the knee      gain = (1/R - 1) · (x - T + W/2)² / (2W)
    above  T + W/2       gain = (1/R - 1) · (x - T)

The curve is continuous at both knee edges, so sweeping the threshold while
audio runs does not click.
*/

pub const DEFAULT_RATIO: f32 = 4.0;
pub const DEFAULT_KNEE_DB: f32 = 6.0;

#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 1e-6 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}

#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

pub struct Compressor {
    threshold_db: f32,
    ratio: f32,
    knee_db: f32,
    attack_coef: f32,
    release_coef: f32,
    envelope: f32,
}

impl Compressor {
    pub fn new(sample_rate: f32) -> Self {
        let mut compressor = Self {
            threshold_db: 0.0,
            ratio: DEFAULT_RATIO,
            knee_db: DEFAULT_KNEE_DB,
            attack_coef: 0.0,
            release_coef: 0.0,
            envelope: 0.0,
        };
        compressor.set_times(0.003, 0.25, sample_rate);
        compressor
    }

    pub fn set_threshold(&mut self, threshold_db: f32) {
        self.threshold_db = threshold_db.clamp(-60.0, 0.0);
    }

    pub fn threshold(&self) -> f32 {
        self.threshold_db
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio.clamp(1.0, 20.0);
    }

    /// Attack and release in seconds.
    pub fn set_times(&mut self, attack: f32, release: f32, sample_rate: f32) {
        self.attack_coef = (-1.0 / (attack.max(1e-4) * sample_rate)).exp();
        self.release_coef = (-1.0 / (release.max(1e-3) * sample_rate)).exp();
    }

    /// Static curve: gain change in dB (always <= 0) for an input level.
    pub fn gain_db(&self, input_db: f32) -> f32 {
        let slope = 1.0 / self.ratio - 1.0;
        let over = input_db - self.threshold_db;
        let half_knee = self.knee_db * 0.5;

        if self.knee_db <= 0.0 || over >= half_knee {
            (slope * over).min(0.0)
        } else if over <= -half_knee {
            0.0
        } else {
            let x = over + half_knee;
            slope * x * x / (2.0 * self.knee_db)
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let level = input.abs();
        let coef = if level > self.envelope {
            self.attack_coef
        } else {
            self.release_coef
        };
        self.envelope = coef * self.envelope + (1.0 - coef) * level;

        let gain = db_to_linear(self.gain_db(linear_to_db(self.envelope)));
        input * gain
    }

    /// Current gain reduction in dB, positive when compressing.
    pub fn gain_reduction(&self) -> f32 {
        -self.gain_db(linear_to_db(self.envelope))
    }

    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}
