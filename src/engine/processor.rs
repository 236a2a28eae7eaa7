use std::sync::Arc;

use rtrb::Consumer;

use crate::capture::CaptureTap;
use crate::drums::DrumPlayer;
use crate::graph::chain::SignalChain;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::io::scope::ScopeTap;
use crate::params::ParamSlots;
use crate::synth::message::SynthMessage;
use crate::synth::poly::PolySynth;
use crate::MAX_BLOCK_SIZE;

/*
Audio Callback
==============

Everything the output device runs, in order, per callback:

    1. drain the command queue   (note on/off, drum triggers, noise gates)
    2. for each block of at most MAX_BLOCK_SIZE frames:
         a. copy parameter slots into the chain's targets
         b. voices  ─┐
            drums   ─┴─ summed into the mono block
         c. signal chain (noise, effects, clamp)
         d. block → visualizer tap, capture tap
         e. block → every output channel

No locks, no allocation, no logging: all buffers are sized at construction
and the only shared state is lock-free (ring buffers and atomics).
*/

/// The real-time half of the engine, owned by an [`AudioSink`](crate::io::AudioSink).
pub struct AudioProcessor {
    commands: Consumer<SynthMessage>,
    slots: Arc<ParamSlots>,
    voices: PolySynth,
    drums: DrumPlayer,
    chain: SignalChain,
    block: Vec<f32>,
    ctx: RenderCtx,
    scope: ScopeTap,
    capture: CaptureTap,
}

impl AudioProcessor {
    pub(crate) fn new(
        sample_rate: f32,
        commands: Consumer<SynthMessage>,
        slots: Arc<ParamSlots>,
        drums: DrumPlayer,
        scope: ScopeTap,
        capture: CaptureTap,
    ) -> Self {
        let mut chain = SignalChain::new(sample_rate);
        chain.update_from(&slots);
        Self {
            commands,
            slots,
            voices: PolySynth::new(sample_rate),
            drums,
            chain,
            block: vec![0.0; MAX_BLOCK_SIZE],
            ctx: RenderCtx::new(sample_rate),
            scope,
            capture,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate
    }

    /// Audio-side voices still sounding, release tails included.
    pub fn active_voices(&self) -> usize {
        self.voices.active_count()
    }

    /// Fill `out` with interleaved frames; the mono master is copied to
    /// every channel.
    pub fn process(&mut self, out: &mut [f32], channels: usize) {
        while let Ok(message) = self.commands.pop() {
            self.dispatch(message);
        }

        let channels = channels.max(1);
        let frames = out.len() / channels;
        let mut written = 0;

        while written < frames {
            let len = (frames - written).min(MAX_BLOCK_SIZE);
            let block = &mut self.block[..len];
            block.fill(0.0);

            self.chain.update_from(&self.slots);
            self.voices.render_block(block);
            self.drums.render_block(block, &self.ctx);
            self.chain.process(block);

            self.scope.write(block);
            self.capture.write(block);

            let start = written * channels;
            for (frame, &sample) in out[start..start + len * channels]
                .chunks_exact_mut(channels)
                .zip(block.iter())
            {
                frame.fill(sample);
            }
            written += len;
        }

        // Trailing partial frame, if the host ever hands one over.
        out[frames * channels..].fill(0.0);
    }

    fn dispatch(&mut self, message: SynthMessage) {
        if self.voices.handle(&message) && !matches!(message, SynthMessage::Panic) {
            return;
        }
        match message {
            SynthMessage::TriggerDrum { row } => self.drums.trigger(row),
            SynthMessage::NoiseStart(color) => self.chain.noise_mut().start(color),
            SynthMessage::NoiseStop(color) => self.chain.noise_mut().stop(color),
            SynthMessage::Panic => {
                self.drums.silence();
                self.chain.reset();
            }
            _ => {}
        }
    }
}
