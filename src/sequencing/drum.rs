//! Drum pattern grid and its sequencer.

use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sequencing::clock::{StepClock, Tick};
use crate::STEPS_PER_PATTERN;

/// Row names of the default kit.
pub const DEFAULT_ROWS: [&str; 3] = ["kick", "snare", "hat"];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrumRow {
    pub name: String,
    pub cells: [bool; STEPS_PER_PATTERN],
}

/// Named drum voices, each with an 8-cell on/off grid.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrumPattern {
    rows: Vec<DrumRow>,
}

impl DrumPattern {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            rows: names
                .into_iter()
                .map(|name| DrumRow {
                    name: name.into(),
                    cells: [false; STEPS_PER_PATTERN],
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[DrumRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_index(&self, name: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.name == name)
    }

    /// Flip one cell; returns its new state, or `None` if out of range.
    pub fn toggle(&mut self, row: usize, step: usize) -> Option<bool> {
        let cell = self.rows.get_mut(row)?.cells.get_mut(step)?;
        *cell = !*cell;
        Some(*cell)
    }

    pub fn is_on(&self, row: usize, step: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.cells.get(step))
            .copied()
            .unwrap_or(false)
    }

    pub fn clear_row(&mut self, row: usize) -> bool {
        match self.rows.get_mut(row) {
            Some(r) => {
                r.cells = [false; STEPS_PER_PATTERN];
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.cells = [false; STEPS_PER_PATTERN];
        }
    }

    /// Rows whose cell at `step` is on.
    pub fn hits_at(&self, step: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(move |(_, row)| row.cells.get(step).copied().unwrap_or(false))
            .map(|(index, _)| index)
    }
}

impl Default for DrumPattern {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS)
    }
}

/// Rows to fire for one drum tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrumHits {
    pub tick: Tick,
    pub rows: Vec<usize>,
}

/// Independent transport over a [`DrumPattern`]. No write mode: the grid is
/// edited by toggles only.
pub struct DrumSequencer {
    pattern: DrumPattern,
    clock: StepClock,
}

impl DrumSequencer {
    pub fn new(pattern: DrumPattern, tempo_bpm: f64) -> Self {
        Self {
            pattern,
            clock: StepClock::new(tempo_bpm, STEPS_PER_PATTERN),
        }
    }

    pub fn pattern(&self) -> &DrumPattern {
        &self.pattern
    }

    pub fn pattern_mut(&mut self) -> &mut DrumPattern {
        &mut self.pattern
    }

    pub fn start(&mut self, now: Instant) {
        self.clock.start(now);
        tracing::info!(tempo = self.clock.tempo(), "drum sequencer started");
    }

    pub fn stop(&mut self) {
        if self.clock.is_running() {
            tracing::info!("drum sequencer stopped");
        }
        self.clock.stop();
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn set_tempo(&mut self, tempo_bpm: f64, now: Instant) {
        self.clock.set_tempo(tempo_bpm, now);
    }

    pub fn tempo(&self) -> f64 {
        self.clock.tempo()
    }

    pub fn current_step(&self) -> usize {
        self.clock.current_step()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.clock.next_deadline()
    }

    pub fn tick(&mut self, now: Instant) -> Option<DrumHits> {
        let tick = self.clock.poll(now)?;
        let rows = self.pattern.hits_at(tick.played).collect();
        Some(DrumHits { tick, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_kit_has_three_rows() {
        let pattern = DrumPattern::default();
        let names: Vec<&str> = pattern.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, DEFAULT_ROWS);
        assert_eq!(pattern.row_index("snare"), Some(1));
    }

    #[test]
    fn toggle_flips_and_reports() {
        let mut pattern = DrumPattern::default();
        assert_eq!(pattern.toggle(0, 4), Some(true));
        assert!(pattern.is_on(0, 4));
        assert_eq!(pattern.toggle(0, 4), Some(false));
        assert_eq!(pattern.toggle(9, 0), None);
        assert_eq!(pattern.toggle(0, STEPS_PER_PATTERN), None);
    }

    #[test]
    fn custom_rows_generalize() {
        let mut pattern = DrumPattern::new(["clap", "rim", "tom", "cowbell"]);
        pattern.toggle(3, 7);
        assert_eq!(pattern.hits_at(7).collect::<Vec<_>>(), vec![3]);
        assert!(pattern.clear_row(3));
        assert_eq!(pattern.hits_at(7).count(), 0);
    }

    #[test]
    fn ticks_fire_rows_of_prior_step() {
        let t0 = Instant::now();
        let mut pattern = DrumPattern::default();
        pattern.toggle(0, 0);
        pattern.toggle(2, 0);
        pattern.toggle(1, 1);
        let mut seq = DrumSequencer::new(pattern, 120.0);
        seq.start(t0);

        let first = seq.tick(t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(first.rows, vec![0, 2]);
        let second = seq.tick(t0 + Duration::from_millis(1_000)).unwrap();
        assert_eq!(second.rows, vec![1]);
        let third = seq.tick(t0 + Duration::from_millis(1_500)).unwrap();
        assert!(third.rows.is_empty());
    }

    #[test]
    fn stopped_sequencer_is_silent() {
        let t0 = Instant::now();
        let mut pattern = DrumPattern::default();
        pattern.toggle(0, 0);
        let mut seq = DrumSequencer::new(pattern, 120.0);
        seq.start(t0);
        seq.stop();
        assert_eq!(seq.tick(t0 + Duration::from_secs(3)), None);
    }
}
