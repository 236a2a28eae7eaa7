use crate::dsp::noise::NoiseColor;
use crate::graph::compressor::{CompressorNode, CompressorParam};
use crate::graph::delay::{EchoNode, EchoParam};
use crate::graph::distortion::{DistortionNode, DistortionParam};
use crate::graph::filter::{FilterNode, FilterParam};
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};
use crate::graph::noise::NoiseBed;
use crate::graph::pitch::{PitchNode, PitchParam};
use crate::graph::reverb::{ReverbNode, ReverbParam};
use crate::graph::tremolo::{StutterNode, StutterParam};
use crate::params::{ParamId, ParamSlots};

/*
Signal Chain
============

The fixed effects topology every voice, noise lane and drum hit runs
through. It is built once and never rewired; only parameters move.

    voices + drums (summed by the caller)
        │
        + noise bed (white / pink / brown)
        │
        ▼
    stutter → distortion → filter → delay → dub → reverb → pitch → compressor
                                                                       │
                                                              clamp [-1, 1]
                                                                       ▼
                                                                    master

Once per block `update_from` copies the atomic parameter slots into each
stage's targets; the stages glide toward them sample by sample.
*/

pub struct SignalChain {
    ctx: RenderCtx,
    noise: NoiseBed,
    stutter: StutterNode,
    distortion: DistortionNode,
    filter: FilterNode,
    delay: EchoNode,
    dub: EchoNode,
    reverb: ReverbNode,
    pitch: PitchNode,
    compressor: CompressorNode,
}

impl SignalChain {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            ctx: RenderCtx::new(sample_rate),
            noise: NoiseBed::new(sample_rate),
            stutter: StutterNode::new(sample_rate),
            distortion: DistortionNode::new(sample_rate),
            filter: FilterNode::new(sample_rate),
            delay: EchoNode::delay(sample_rate),
            dub: EchoNode::dub(sample_rate),
            reverb: ReverbNode::new(sample_rate),
            pitch: PitchNode::new(sample_rate),
            compressor: CompressorNode::new(sample_rate),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate
    }

    pub fn noise_mut(&mut self) -> &mut NoiseBed {
        &mut self.noise
    }

    pub fn noise(&self) -> &NoiseBed {
        &self.noise
    }

    /// Copy current slot values into every stage's targets.
    pub fn update_from(&mut self, slots: &ParamSlots) {
        self.noise
            .set_level(NoiseColor::White, slots.load(ParamId::WhiteNoise));
        self.noise
            .set_level(NoiseColor::Pink, slots.load(ParamId::PinkNoise));
        self.noise
            .set_level(NoiseColor::Brown, slots.load(ParamId::BrownNoise));

        self.stutter
            .set_param(StutterParam::Depth, slots.load(ParamId::StutterDepth));
        self.stutter
            .set_param(StutterParam::Rate, slots.load(ParamId::StutterRate));
        self.distortion
            .set_param(DistortionParam::Amount, slots.load(ParamId::Distortion));
        self.filter
            .set_param(FilterParam::Amount, slots.load(ParamId::Filter));
        self.delay
            .set_param(EchoParam::Amount, slots.load(ParamId::Delay));
        self.dub.set_param(EchoParam::Amount, slots.load(ParamId::Dub));
        self.reverb
            .set_param(ReverbParam::Amount, slots.load(ParamId::Reverb));
        self.pitch
            .set_param(PitchParam::Semitones, slots.load(ParamId::PitchShift));
        self.compressor.set_param(
            CompressorParam::Threshold,
            slots.load(ParamId::CompressorThreshold),
        );
    }

    /// Run `buffer` (the summed voice/drum bus) through the chain in place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        let ctx = self.ctx;
        self.noise.render_block(buffer, &ctx);
        self.stutter.render_block(buffer, &ctx);
        self.distortion.render_block(buffer, &ctx);
        self.filter.render_block(buffer, &ctx);
        self.delay.render_block(buffer, &ctx);
        self.dub.render_block(buffer, &ctx);
        self.reverb.render_block(buffer, &ctx);
        self.pitch.render_block(buffer, &ctx);
        self.compressor.render_block(buffer, &ctx);

        for sample in buffer.iter_mut() {
            *sample = if sample.is_finite() {
                sample.clamp(-1.0, 1.0)
            } else {
                0.0
            };
        }
    }

    /// Clear every tail (echo, reverb, filter memory) and park the noise.
    pub fn reset(&mut self) {
        self.noise.silence();
        self.stutter.reset();
        self.filter.reset();
        self.delay.reset();
        self.dub.reset();
        self.reverb.reset();
        self.pitch.reset();
        self.compressor.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorBlock;
    use crate::params::SignalGraphParams;

    fn render(chain: &mut SignalChain, osc: &mut OscillatorBlock, blocks: usize) -> Vec<f32> {
        let mut all = Vec::new();
        for _ in 0..blocks {
            let mut buffer = vec![0.0f32; 256];
            osc.render(&mut buffer, 220.0, chain.sample_rate());
            chain.process(&mut buffer);
            all.extend_from_slice(&buffer);
        }
        all
    }

    #[test]
    fn default_patch_is_close_to_transparent() {
        let slots = ParamSlots::new(&SignalGraphParams::default());
        let mut chain = SignalChain::new(48_000.0);
        chain.update_from(&slots);

        let mut osc = OscillatorBlock::sine();
        let out = render(&mut chain, &mut osc, 40);
        let peak = out[4_800..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(peak > 0.9 && peak <= 1.0, "peak {peak}");
    }

    #[test]
    fn output_never_leaves_unit_range() {
        let slots = ParamSlots::default();
        for id in ParamId::ALL {
            slots.store(id, id.range().1);
        }
        let mut chain = SignalChain::new(48_000.0);
        chain.noise_mut().start(NoiseColor::White);
        chain.update_from(&slots);

        let mut osc = OscillatorBlock::square();
        let mut buffer = vec![0.0f32; 512];
        for _ in 0..200 {
            osc.render(&mut buffer, 110.0, 48_000.0);
            for s in buffer.iter_mut() {
                *s *= 3.0;
            }
            chain.process(&mut buffer);
            assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
        }
    }

    #[test]
    fn reset_clears_tails() {
        let slots = ParamSlots::default();
        slots.store(ParamId::Reverb, 100.0);
        slots.store(ParamId::Dub, 100.0);
        let mut chain = SignalChain::new(48_000.0);
        chain.update_from(&slots);

        let mut osc = OscillatorBlock::sawtooth();
        render(&mut chain, &mut osc, 50);
        chain.reset();

        let mut silence = vec![0.0f32; 1_024];
        chain.process(&mut silence);
        assert!(silence.iter().all(|&s| s == 0.0));
    }
}
