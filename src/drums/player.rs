use crate::drums::SampleSource;
use crate::graph::node::{GraphNode, RenderCtx};

/// Concurrent one-shots across all rows. A fresh trigger with every slot
/// busy steals the hit that has played the longest.
pub const MAX_ONE_SHOTS: usize = 16;

const DRUM_BUS_GAIN: f32 = 0.8;

#[derive(Debug, Clone, Copy, Default)]
struct OneShot {
    row: usize,
    position: usize,
    active: bool,
}

/// Audio-side drum voice pool.
///
/// Retriggering a row never cuts the previous hit: each trigger claims its
/// own slot, so fast patterns overlap naturally.
pub struct DrumPlayer {
    samples: Vec<Vec<f32>>,
    hits: [OneShot; MAX_ONE_SHOTS],
}

impl DrumPlayer {
    /// Resolve every row name through `source` at `sample_rate`.
    pub fn new<'a>(
        source: &dyn SampleSource,
        rows: impl IntoIterator<Item = &'a str>,
        sample_rate: u32,
    ) -> Self {
        let samples = rows
            .into_iter()
            .map(|name| {
                source.resolve(name, sample_rate).unwrap_or_else(|| {
                    tracing::warn!(row = name, "drum kit has no sample for row");
                    Vec::new()
                })
            })
            .collect();
        Self::from_samples(samples)
    }

    pub fn from_samples(samples: Vec<Vec<f32>>) -> Self {
        Self {
            samples,
            hits: [OneShot::default(); MAX_ONE_SHOTS],
        }
    }

    pub fn rows(&self) -> usize {
        self.samples.len()
    }

    pub fn trigger(&mut self, row: usize) {
        if self.samples.get(row).map_or(true, Vec::is_empty) {
            return;
        }

        let slot = match self.hits.iter().position(|h| !h.active) {
            Some(index) => index,
            None => self
                .hits
                .iter()
                .enumerate()
                .max_by_key(|(_, h)| h.position)
                .map(|(index, _)| index)
                .unwrap_or(0),
        };
        self.hits[slot] = OneShot {
            row,
            position: 0,
            active: true,
        };
    }

    /// Cut every hit immediately.
    pub fn silence(&mut self) {
        for hit in &mut self.hits {
            hit.active = false;
        }
    }

    pub fn active_hits(&self) -> usize {
        self.hits.iter().filter(|h| h.active).count()
    }
}

impl GraphNode for DrumPlayer {
    /// Adds every sounding hit into `out`.
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for hit in self.hits.iter_mut().filter(|h| h.active) {
            let sample = &self.samples[hit.row];
            let remaining = &sample[hit.position.min(sample.len())..];
            let count = remaining.len().min(out.len());
            for (o, &s) in out.iter_mut().zip(&remaining[..count]) {
                *o += s * DRUM_BUS_GAIN;
            }
            hit.position += count;
            if hit.position >= sample.len() {
                hit.active = false;
            }
        }
    }

    fn reset(&mut self) {
        self.silence();
    }

    fn is_active(&self) -> bool {
        self.hits.iter().any(|h| h.active)
    }
}
