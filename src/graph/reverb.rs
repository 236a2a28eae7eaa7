use crate::dsp::mix::blend_dry_wet;
use crate::dsp::reverb::SchroederReverb;
use crate::dsp::smooth::SmoothedParam;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Reverb Node
===========

The Schroeder network from `dsp/reverb.rs` with a fixed medium room
(size 0.6, damping 0.4). The 0-100 amount is the wet share.

When the amount has glided to 0 the network is skipped entirely; its
delay buffers keep whatever tail they held, which fades in naturally if
the amount comes back up.
*/

const ROOM_SIZE: f32 = 0.6;
const DAMPING: f32 = 0.4;

#[derive(Clone, Copy, Debug)]
pub enum ReverbParam {
    /// Wet amount, 0..100
    Amount,
}

pub struct ReverbNode {
    reverb: SchroederReverb,
    wet: SmoothedParam,
}

impl ReverbNode {
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = SchroederReverb::new(sample_rate);
        reverb.set_room_size(ROOM_SIZE);
        reverb.set_damping(DAMPING);
        Self {
            reverb,
            wet: SmoothedParam::with_default_time(0.0, sample_rate),
        }
    }
}

impl GraphNode for ReverbNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        if self.wet.is_settled() && self.wet.value() == 0.0 {
            return;
        }
        for sample in out.iter_mut() {
            let dry = *sample;
            let wet = self.reverb.process(dry);
            *sample = blend_dry_wet(dry, wet, self.wet.next());
        }
    }

    fn reset(&mut self) {
        self.reverb.reset();
    }
}

impl Modulatable for ReverbNode {
    type Param = ReverbParam;

    fn get_param(&self, _param: Self::Param) -> f32 {
        self.wet.target() * 100.0
    }

    fn set_param(&mut self, _param: Self::Param, value: f32) {
        self.wet.set_target(value.clamp(0.0, 100.0) / 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wet_reverb_rings_after_input_stops() {
        let ctx = RenderCtx::new(48_000.0);
        let mut node = ReverbNode::new(ctx.sample_rate);
        node.set_param(ReverbParam::Amount, 80.0);

        let mut buffer = vec![0.0f32; 9_600];
        buffer[..480].fill(0.5);
        node.render_block(&mut buffer, &ctx);

        let tail_energy: f32 = buffer[4_800..].iter().map(|s| s * s).sum();
        assert!(tail_energy > 1e-3, "tail energy {tail_energy}");
    }
}
