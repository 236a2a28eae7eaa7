use crate::dsp::pitch::PitchShifter;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/// Pitch-shift stage, -12..12 semitones, 0 = bypass.
///
/// Unlike the other stages the value is not glided: a sliding shift ratio
/// reads as a pitch bend, while the chain wants discrete intervals.
#[derive(Clone, Copy, Debug)]
pub enum PitchParam {
    Semitones,
}

pub struct PitchNode {
    shifter: PitchShifter,
    semitones: f32,
}

impl PitchNode {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            shifter: PitchShifter::new(sample_rate),
            semitones: 0.0,
        }
    }
}

impl GraphNode for PitchNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.shifter.process(*sample, self.semitones);
        }
    }

    fn reset(&mut self) {
        self.shifter.reset();
    }
}

impl Modulatable for PitchNode {
    type Param = PitchParam;

    fn get_param(&self, _param: Self::Param) -> f32 {
        self.semitones
    }

    fn set_param(&mut self, _param: Self::Param, value: f32) {
        self.semitones = value.clamp(-12.0, 12.0);
    }
}
