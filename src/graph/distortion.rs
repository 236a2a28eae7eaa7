use crate::dsp::distortion::{amount_to_drive, waveshape};
use crate::dsp::smooth::SmoothedParam;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Distortion Node
===============

Always in line and fully wet: at amount 0 the shaper is the identity, so
no separate bypass or dry path is needed. The amount (0-100) glides, and
the drive it maps to is recomputed every sample.
*/

#[derive(Clone, Copy, Debug)]
pub enum DistortionParam {
    /// 0..100
    Amount,
}

pub struct DistortionNode {
    amount: SmoothedParam,
}

impl DistortionNode {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            amount: SmoothedParam::with_default_time(0.0, sample_rate),
        }
    }
}

impl GraphNode for DistortionNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        if self.amount.is_settled() && self.amount.value() == 0.0 {
            return;
        }
        for sample in out.iter_mut() {
            let drive = amount_to_drive(self.amount.next());
            *sample = waveshape(*sample, drive);
        }
    }
}

impl Modulatable for DistortionNode {
    type Param = DistortionParam;

    fn get_param(&self, _param: Self::Param) -> f32 {
        self.amount.target()
    }

    fn set_param(&mut self, _param: Self::Param, value: f32) {
        self.amount.set_target(value.clamp(0.0, 100.0));
    }
}
