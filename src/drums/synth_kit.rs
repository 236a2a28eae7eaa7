use crate::dsp::filter::OnePole;
use crate::dsp::noise::NoiseGenerator;
use crate::dsp::oscillator::OscillatorBlock;
use crate::drums::SampleSource;

/*
Synthesized Kit
===============

Three classic electronic drums, rendered once into plain buffers.

  kick   sine body whose pitch falls from 150 Hz to 50 Hz in ~40 ms,
         fast exponential decay, smoothed by a lowpass
  snare  triangle body at 180 Hz plus a brighter noise rattle
  hat    white noise with the lows removed, very short decay

"Removing the lows" is done by subtracting a one-pole lowpass from the
signal, which leaves a gentle highpass without a dedicated filter type.
*/

const KICK_SECONDS: f32 = 0.45;
const SNARE_SECONDS: f32 = 0.3;
const HAT_SECONDS: f32 = 0.12;

/// Decay envelope `e^(-t / tau)`.
#[inline]
fn decay(t: f32, tau: f32) -> f32 {
    (-t / tau).exp()
}

fn kick(sample_rate: f32) -> Vec<f32> {
    let len = (KICK_SECONDS * sample_rate).round() as usize;
    let mut body = OscillatorBlock::sine();
    let mut smooth = OnePole::new(2_000.0, sample_rate);

    (0..len)
        .map(|n| {
            let t = n as f32 / sample_rate;
            let freq = 50.0 + 100.0 * decay(t, 0.04);
            let s = body.next_sample(freq, sample_rate) * decay(t, 0.12);
            smooth.next_sample(s) * 0.95
        })
        .collect()
}

fn snare(sample_rate: f32) -> Vec<f32> {
    let len = (SNARE_SECONDS * sample_rate).round() as usize;
    let mut body = OscillatorBlock::triangle();
    let mut rattle = NoiseGenerator::white(0x5A5A_1234);
    let mut lows = OnePole::new(1_200.0, sample_rate);

    (0..len)
        .map(|n| {
            let t = n as f32 / sample_rate;
            let tone = body.next_sample(180.0, sample_rate) * decay(t, 0.05);
            let noise = rattle.next_sample();
            let bright = noise - lows.next_sample(noise);
            (0.45 * tone + 0.6 * bright * decay(t, 0.07)).clamp(-1.0, 1.0)
        })
        .collect()
}

fn hat(sample_rate: f32) -> Vec<f32> {
    let len = (HAT_SECONDS * sample_rate).round() as usize;
    let mut source = NoiseGenerator::white(0x0BAD_F00D);
    let mut lows = OnePole::new(6_000.0, sample_rate);

    (0..len)
        .map(|n| {
            let t = n as f32 / sample_rate;
            let noise = source.next_sample();
            (noise - lows.next_sample(noise)) * 0.5 * decay(t, 0.025)
        })
        .collect()
}

/// Kick, snare and hat synthesized from the crate's own oscillators.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthKit;

impl SynthKit {
    pub fn new() -> Self {
        Self
    }
}

impl SampleSource for SynthKit {
    fn resolve(&self, voice: &str, sample_rate: u32) -> Option<Vec<f32>> {
        let sr = sample_rate as f32;
        match voice {
            "kick" => Some(kick(sr)),
            "snare" => Some(snare(sr)),
            "hat" | "hihat" | "closed_hat" => Some(hat(sr)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0.0f32, |m, &s| m.max(s.abs()))
    }

    #[test]
    fn default_rows_resolve() {
        let kit = SynthKit::new();
        for name in ["kick", "snare", "hat"] {
            let buffer = kit.resolve(name, 48_000).expect("row should resolve");
            assert!(!buffer.is_empty());
            assert!(peak(&buffer) > 0.05, "{name} is silent");
            assert!(peak(&buffer) <= 1.0, "{name} clips");
        }
        assert!(kit.resolve("cowbell", 48_000).is_none());
    }

    #[test]
    fn length_follows_sample_rate() {
        let kit = SynthKit::new();
        let a = kit.resolve("kick", 24_000).unwrap();
        let b = kit.resolve("kick", 48_000).unwrap();
        assert_eq!(b.len(), a.len() * 2);
    }

    #[test]
    fn hits_decay_to_near_silence() {
        let kit = SynthKit::new();
        for name in ["kick", "snare", "hat"] {
            let buffer = kit.resolve(name, 48_000).unwrap();
            let tail = &buffer[buffer.len() - 64..];
            assert!(peak(tail) < 0.05, "{name} tail too loud");
        }
    }
}
