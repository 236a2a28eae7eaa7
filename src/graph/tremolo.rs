use crate::dsp::lfo::Lfo;
use crate::dsp::smooth::SmoothedParam;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Stutter
=======

First stage of the chain: a tremolo that chops the summed input in time
with a sine LFO. Depth 0 is transparent, depth 1 pulses down to silence.
See `dsp/lfo.rs` for the gain curve.
*/

#[derive(Clone, Copy, Debug)]
pub enum StutterParam {
    /// 0..1
    Depth,
    /// 1..32 Hz
    Rate,
}

pub struct StutterNode {
    lfo: Lfo,
    depth: SmoothedParam,
    rate: SmoothedParam,
}

impl StutterNode {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            lfo: Lfo::new(),
            depth: SmoothedParam::with_default_time(0.0, sample_rate),
            rate: SmoothedParam::with_default_time(4.0, sample_rate),
        }
    }
}

impl GraphNode for StutterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.depth.is_settled() && self.depth.value() == 0.0 {
            // keep the LFO moving so the pulse stays in time when depth returns
            for _ in 0..out.len() {
                self.lfo.next_sample(self.rate.next(), ctx.sample_rate);
            }
            return;
        }

        for sample in out.iter_mut() {
            let gain = self
                .lfo
                .tremolo_gain(self.depth.next(), self.rate.next(), ctx.sample_rate);
            *sample *= gain;
        }
    }

    fn reset(&mut self) {
        self.lfo.reset();
    }
}

impl Modulatable for StutterNode {
    type Param = StutterParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            StutterParam::Depth => self.depth.target(),
            StutterParam::Rate => self.rate.target(),
        }
    }

    fn set_param(&mut self, param: Self::Param, value: f32) {
        match param {
            StutterParam::Depth => self.depth.set_target(value.clamp(0.0, 1.0)),
            StutterParam::Rate => self.rate.set_target(value.clamp(1.0, 32.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_depth_passes_audio() {
        let mut node = StutterNode::new(48_000.0);
        let mut buffer = vec![0.5f32; 256];
        node.render_block(&mut buffer, &RenderCtx::new(48_000.0));
        assert!(buffer.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn full_depth_chops_the_signal() {
        let ctx = RenderCtx::new(48_000.0);
        let mut node = StutterNode::new(ctx.sample_rate);
        node.set_param(StutterParam::Depth, 1.0);
        node.set_param(StutterParam::Rate, 8.0);

        let mut buffer = vec![1.0f32; 48_000];
        node.render_block(&mut buffer, &ctx);
        let tail = &buffer[4_800..];
        assert!(tail.iter().cloned().fold(f32::MAX, f32::min) < 0.01);
        assert!(tail.iter().cloned().fold(f32::MIN, f32::max) > 0.99);
    }
}
