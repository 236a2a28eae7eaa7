use crate::dsp::filter::SVFilter;
use crate::dsp::smooth::SmoothedParam;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Filter Node
===========

A lowpass that is always in the chain. The 0-100 amount maps linearly onto
the cutoff:

    cutoff = 800 + amount · 70        0 → 800 Hz, 100 → 7800 Hz

The cutoff itself is what glides, so a sweep moves evenly in Hz.
*/

pub const MIN_CUTOFF_HZ: f32 = 800.0;
pub const MAX_CUTOFF_HZ: f32 = 7800.0;

/// 0..100 → 800..7800 Hz.
#[inline]
pub fn amount_to_cutoff(amount: f32) -> f32 {
    MIN_CUTOFF_HZ + (amount.clamp(0.0, 100.0) / 100.0) * (MAX_CUTOFF_HZ - MIN_CUTOFF_HZ)
}

#[derive(Clone, Copy, Debug)]
pub enum FilterParam {
    /// 0..100
    Amount,
}

pub struct FilterNode {
    filter: SVFilter,
    cutoff: SmoothedParam,
}

impl FilterNode {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            filter: SVFilter::lowpass(MAX_CUTOFF_HZ),
            cutoff: SmoothedParam::with_default_time(MAX_CUTOFF_HZ, sample_rate),
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            self.filter.set_cutoff(self.cutoff.next());
            *sample = self.filter.next_sample(*sample, ctx.sample_rate);
        }
    }

    fn reset(&mut self) {
        self.filter.reset();
    }
}

impl Modulatable for FilterNode {
    type Param = FilterParam;

    fn get_param(&self, _param: Self::Param) -> f32 {
        let cutoff = self.cutoff.target();
        (cutoff - MIN_CUTOFF_HZ) / (MAX_CUTOFF_HZ - MIN_CUTOFF_HZ) * 100.0
    }

    fn set_param(&mut self, _param: Self::Param, value: f32) {
        self.cutoff.set_target(amount_to_cutoff(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_maps_linearly() {
        assert_eq!(amount_to_cutoff(0.0), 800.0);
        assert_eq!(amount_to_cutoff(50.0), 4300.0);
        assert_eq!(amount_to_cutoff(100.0), 7800.0);
        assert_eq!(amount_to_cutoff(-3.0), 800.0);
    }

    #[test]
    fn get_param_inverts_mapping() {
        let mut node = FilterNode::new(48_000.0);
        node.set_param(FilterParam::Amount, 25.0);
        assert!((node.get_param(FilterParam::Amount) - 25.0).abs() < 1e-3);
    }
}
