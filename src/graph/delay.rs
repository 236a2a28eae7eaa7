use crate::dsp::delay::DelayLine;
use crate::dsp::filter::OnePole;
use crate::dsp::mix::blend_dry_wet;
use crate::dsp::smooth::SmoothedParam;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Echo Node
=========

One feedback delay serves both echo stages in the chain:

    input ──┬───────────────────────────────(dry)──┐
            └──→ (+) ──→ [delay line] ──┬─(wet)──→ blend ──→ out
                  ↑                      │
                  └── [tone] ←── × fb ←──┘

    stage   time    feedback   tone in the loop
    delay   350 ms  0.35       none
    dub     750 ms  0.60       one-pole lowpass at 1.8 kHz

The dub echo darkens every repeat, so its long tail melts into the
background instead of ringing. Time and feedback are fixed; only the
wet amount (0-100 → 0-1) is live.
*/

pub const DELAY_TIME_MS: f32 = 350.0;
pub const DELAY_FEEDBACK: f32 = 0.35;
pub const DUB_TIME_MS: f32 = 750.0;
pub const DUB_FEEDBACK: f32 = 0.6;
pub const DUB_TONE_HZ: f32 = 1800.0;

#[derive(Clone, Copy, Debug)]
pub enum EchoParam {
    /// Wet amount, 0..100
    Amount,
}

pub struct EchoNode {
    line: DelayLine,
    delay_samples: usize,
    feedback: f32,
    tone: Option<OnePole>,
    wet: SmoothedParam,
}

impl EchoNode {
    pub fn new(time_ms: f32, feedback: f32, tone_hz: Option<f32>, sample_rate: f32) -> Self {
        let delay_samples = ((time_ms / 1000.0) * sample_rate).round().max(1.0) as usize;
        Self {
            line: DelayLine::with_capacity(delay_samples + 1),
            delay_samples,
            feedback: feedback.clamp(0.0, 0.95),
            tone: tone_hz.map(|hz| OnePole::new(hz, sample_rate)),
            wet: SmoothedParam::with_default_time(0.0, sample_rate),
        }
    }

    /// 350 ms slapback-ish echo.
    pub fn delay(sample_rate: f32) -> Self {
        Self::new(DELAY_TIME_MS, DELAY_FEEDBACK, None, sample_rate)
    }

    /// Long, dark dub echo.
    pub fn dub(sample_rate: f32) -> Self {
        Self::new(DUB_TIME_MS, DUB_FEEDBACK, Some(DUB_TONE_HZ), sample_rate)
    }

    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }
}

impl GraphNode for EchoNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            let dry = *sample;
            let echo = self.line.read(self.delay_samples);
            let returned = match self.tone.as_mut() {
                Some(tone) => tone.next_sample(echo),
                None => echo,
            };
            self.line.write(dry + returned * self.feedback);
            *sample = blend_dry_wet(dry, echo, self.wet.next());
        }
    }

    fn reset(&mut self) {
        self.line.reset();
        if let Some(tone) = self.tone.as_mut() {
            tone.reset();
        }
    }
}

impl Modulatable for EchoNode {
    type Param = EchoParam;

    fn get_param(&self, _param: Self::Param) -> f32 {
        self.wet.target() * 100.0
    }

    fn set_param(&mut self, _param: Self::Param, value: f32) {
        self.wet.set_target(value.clamp(0.0, 100.0) / 100.0);
    }
}
