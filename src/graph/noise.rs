use crate::dsp::noise::{NoiseColor, NoiseGenerator};
use crate::dsp::smooth::SmoothedParam;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Noise Bed
=========

Three free-running generators (white, pink, brown) summed into the chain
input, each behind its own gain:

    level 0 ──(level > 0)──→ start ──→ running ──(level back to 0)──→ stop

Start and stop are issued from the control side when a level crosses zero.
A stopped generator costs nothing. Stopping does not cut the sound: the
generator keeps running until its gain has glided to silence, then parks.
*/

struct NoiseLane {
    generator: NoiseGenerator,
    level: SmoothedParam,
    enabled: bool,
    running: bool,
}

pub struct NoiseBed {
    lanes: [NoiseLane; 3],
}

impl NoiseBed {
    pub fn new(sample_rate: f32) -> Self {
        let lanes = NoiseColor::ALL.map(|color| NoiseLane {
            generator: NoiseGenerator::new(color, 0x9E37_79B9 ^ (color.index() as u32 + 1)),
            level: SmoothedParam::with_default_time(0.0, sample_rate),
            enabled: false,
            running: false,
        });
        Self { lanes }
    }

    pub fn start(&mut self, color: NoiseColor) {
        let lane = &mut self.lanes[color.index()];
        if !lane.running {
            lane.generator.reset();
        }
        lane.enabled = true;
        lane.running = true;
    }

    /// Fade out, then park the generator.
    pub fn stop(&mut self, color: NoiseColor) {
        let lane = &mut self.lanes[color.index()];
        lane.enabled = false;
        lane.level.set_target(0.0);
    }

    /// Park every generator immediately.
    pub fn silence(&mut self) {
        for lane in &mut self.lanes {
            lane.enabled = false;
            lane.running = false;
            lane.level.snap(0.0);
        }
    }

    pub fn set_level(&mut self, color: NoiseColor, level: f32) {
        let lane = &mut self.lanes[color.index()];
        if lane.enabled {
            lane.level.set_target(level.clamp(0.0, 1.0));
        }
    }

    pub fn is_running(&self, color: NoiseColor) -> bool {
        self.lanes[color.index()].running
    }
}

impl GraphNode for NoiseBed {
    /// Adds noise on top of whatever `out` already holds.
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for lane in &mut self.lanes {
            if !lane.running {
                continue;
            }
            for sample in out.iter_mut() {
                *sample += lane.generator.next_sample() * lane.level.next();
            }
            if !lane.enabled && lane.level.is_settled() {
                lane.running = false;
            }
        }
    }

    fn is_active(&self) -> bool {
        self.lanes.iter().any(|lane| lane.running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_bed_adds_nothing() {
        let mut bed = NoiseBed::new(48_000.0);
        bed.set_level(NoiseColor::White, 1.0);
        let mut buffer = vec![0.0f32; 128];
        bed.render_block(&mut buffer, &RenderCtx::new(48_000.0));
        assert!(buffer.iter().all(|&s| s == 0.0));
        assert!(!bed.is_active());
    }

    #[test]
    fn started_lane_adds_noise_then_parks_after_stop() {
        let ctx = RenderCtx::new(48_000.0);
        let mut bed = NoiseBed::new(ctx.sample_rate);
        bed.start(NoiseColor::Pink);
        bed.set_level(NoiseColor::Pink, 0.5);

        let mut buffer = vec![0.0f32; 2_048];
        bed.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().any(|&s| s != 0.0));
        assert!(bed.is_running(NoiseColor::Pink));

        bed.stop(NoiseColor::Pink);
        for _ in 0..20 {
            buffer.fill(0.0);
            bed.render_block(&mut buffer, &ctx);
        }
        assert!(!bed.is_running(NoiseColor::Pink));
        buffer.fill(0.0);
        bed.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn silence_parks_everything() {
        let mut bed = NoiseBed::new(48_000.0);
        for color in NoiseColor::ALL {
            bed.start(color);
            bed.set_level(color, 0.3);
        }
        bed.silence();
        assert!(!bed.is_active());
    }
}
