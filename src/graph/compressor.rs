use crate::dsp::compressor::Compressor;
use crate::dsp::smooth::SmoothedParam;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/// Last stage before master: 4:1 soft-knee compression with a live threshold.
#[derive(Clone, Copy, Debug)]
pub enum CompressorParam {
    /// -60..0 dB
    Threshold,
}

pub struct CompressorNode {
    compressor: Compressor,
    threshold: SmoothedParam,
}

impl CompressorNode {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            compressor: Compressor::new(sample_rate),
            threshold: SmoothedParam::with_default_time(0.0, sample_rate),
        }
    }

    /// Gain reduction in dB, for metering.
    pub fn gain_reduction(&self) -> f32 {
        self.compressor.gain_reduction()
    }
}

impl GraphNode for CompressorNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            self.compressor.set_threshold(self.threshold.next());
            *sample = self.compressor.process(*sample);
        }
    }

    fn reset(&mut self) {
        self.compressor.reset();
    }
}

impl Modulatable for CompressorNode {
    type Param = CompressorParam;

    fn get_param(&self, _param: Self::Param) -> f32 {
        self.threshold.target()
    }

    fn set_param(&mut self, _param: Self::Param, value: f32) {
        self.threshold.set_target(value.clamp(-60.0, 0.0));
    }
}
