//! Melodic 8-step sequencer with write capture.

use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::SignalGraphParams;
use crate::sequencing::clock::{StepClock, Tick};
use crate::synth::note::NoteId;
use crate::STEPS_PER_PATTERN;

/*
Write Capture
=============

    Write off ──(toggle)──→ Write on ──(select step k)──→ capturing into k
        ↑                                                       │
        └──────── (toggle off: selection is cleared) ───────────┘

While capturing, each qualifying performance event overwrites step k with a
complete snapshot: every graph parameter plus the held note, its octave and
velocity. A parameter change with no single held note writes a rest. The
last write wins.

Turning Write off forgets the selection, so switching it back on records
nothing until a step is picked again.

Playback
========

Each tick plays the step that was current *before* the clock advanced, while
the display moves to the next one: the highlighted step is always one ahead
of what is sounding. A played note is held until the next tick (or stop),
then released.
*/

/// The note part of a recorded step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct StepNote {
    pub note: NoteId,
    pub octave: i32,
    pub velocity: u8,
    pub params: SignalGraphParams,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StepSlot {
    #[default]
    Rest,
    Note(StepNote),
}

impl StepSlot {
    pub fn is_rest(&self) -> bool {
        matches!(self, StepSlot::Rest)
    }

    pub fn note(&self) -> Option<&StepNote> {
        match self {
            StepSlot::Note(note) => Some(note),
            StepSlot::Rest => None,
        }
    }
}

/// A performance event offered to write capture.
#[derive(Debug, Clone, Copy)]
pub struct CaptureEvent<'a> {
    pub params: &'a SignalGraphParams,
    /// `(note, octave, velocity)` of the single held note, if exactly one is held.
    pub held: Option<(NoteId, i32, u8)>,
}

/// What the engine must do for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct StepAction {
    pub tick: Tick,
    /// Note started by the previous tick, to release first.
    pub release: Option<NoteId>,
    /// Step contents to apply and play.
    pub play: Option<StepNote>,
}

pub struct StepSequencer {
    slots: Vec<StepSlot>,
    clock: StepClock,
    write: bool,
    selected: Option<usize>,
    sounding: Option<NoteId>,
    writes: u64,
}

impl StepSequencer {
    pub fn new(tempo_bpm: f64) -> Self {
        Self {
            slots: vec![StepSlot::Rest; STEPS_PER_PATTERN],
            clock: StepClock::new(tempo_bpm, STEPS_PER_PATTERN),
            write: false,
            selected: None,
            sounding: None,
            writes: 0,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.clock.start(now);
        tracing::info!(tempo = self.clock.tempo(), "step sequencer started");
    }

    /// Stop the transport. Returns the note left sounding by playback, if any.
    pub fn stop(&mut self) -> Option<NoteId> {
        if self.clock.is_running() {
            tracing::info!("step sequencer stopped");
        }
        self.clock.stop();
        self.sounding.take()
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

    /// Advance the clock; returns what to do if a tick was due.
    pub fn tick(&mut self, now: Instant) -> Option<StepAction> {
        let tick = self.clock.poll(now)?;
        let release = self.sounding.take();
        let play = self.slots[tick.played].note().cloned();
        self.sounding = play.as_ref().map(|step| step.note);
        Some(StepAction {
            tick,
            release,
            play,
        })
    }

    /// Forget the note from the last tick, e.g. when it never got a voice.
    pub fn clear_gate(&mut self) {
        self.sounding = None;
    }

    pub fn set_write(&mut self, enabled: bool) {
        self.write = enabled;
        if !enabled {
            self.selected = None;
        }
    }

    pub fn write_enabled(&self) -> bool {
        self.write
    }

    /// Select the step that write capture records into.
    pub fn select_step(&mut self, index: usize) -> bool {
        if index >= self.slots.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Record `event` into the selected step. Returns whether a write happened.
    pub fn capture(&mut self, event: CaptureEvent<'_>) -> bool {
        let Some(index) = self.selected.filter(|_| self.write) else {
            return false;
        };

        self.slots[index] = match event.held {
            Some((note, octave, velocity)) => StepSlot::Note(StepNote {
                note,
                octave,
                velocity,
                params: event.params.clone(),
            }),
            None => StepSlot::Rest,
        };
        self.writes += 1;
        tracing::debug!(
            step = index,
            note = ?self.slots[index].note().map(|n| n.note),
            "step written"
        );
        true
    }

    /// Number of writes since construction.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    pub fn slot(&self, index: usize) -> Option<&StepSlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[StepSlot] {
        &self.slots
    }

    /// Put a slot directly (pattern loading, tests).
    pub fn set_slot(&mut self, index: usize, slot: StepSlot) -> bool {
        match self.slots.get_mut(index) {
            Some(existing) => {
                *existing = slot;
                true
            }
            None => false,
        }
    }

    pub fn clear_step(&mut self, index: usize) -> bool {
        self.set_slot(index, StepSlot::Rest)
    }

    pub fn clear_pattern(&mut self) {
        self.slots.fill(StepSlot::Rest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn step(note: NoteId) -> StepSlot {
        StepSlot::Note(StepNote {
            note,
            octave: 4,
            velocity: 80,
            params: SignalGraphParams::default(),
        })
    }

    #[test]
    fn plays_prior_step_on_each_tick() {
        let t0 = Instant::now();
        let mut seq = StepSequencer::new(120.0);
        seq.set_slot(0, step(NoteId::A));
        seq.set_slot(2, step(NoteId::B));
        seq.start(t0);

        let played: Vec<Option<NoteId>> = (1..=3u64)
            .map(|n| {
                let action = seq.tick(t0 + Duration::from_millis(500 * n)).unwrap();
                action.play.map(|s| s.note)
            })
            .collect();
        assert_eq!(played, vec![Some(NoteId::A), None, Some(NoteId::B)]);
        assert_eq!(seq.current_step(), 3);
    }

    #[test]
    fn played_note_is_released_next_tick_and_on_stop() {
        let t0 = Instant::now();
        let mut seq = StepSequencer::new(120.0);
        seq.set_slot(0, step(NoteId::C));
        seq.set_slot(1, step(NoteId::E));
        seq.start(t0);

        let first = seq.tick(t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(first.release, None);
        let second = seq.tick(t0 + Duration::from_millis(1_000)).unwrap();
        assert_eq!(second.release, Some(NoteId::C));
        assert_eq!(seq.stop(), Some(NoteId::E));
    }

    #[test]
    fn write_requires_a_selected_step() {
        let params = SignalGraphParams::default();
        let event = CaptureEvent {
            params: &params,
            held: Some((NoteId::G, 3, 90)),
        };
        let mut seq = StepSequencer::new(120.0);
        seq.set_write(true);
        assert!(!seq.capture(event));

        seq.select_step(5);
        assert!(seq.capture(event));
        let written = seq.slot(5).and_then(|s| s.note()).unwrap();
        assert_eq!((written.note, written.octave, written.velocity), (NoteId::G, 3, 90));
    }

    #[test]
    fn write_toggle_clears_selection() {
        let params = SignalGraphParams::default();
        let mut seq = StepSequencer::new(120.0);
        seq.set_write(true);
        seq.select_step(2);
        seq.set_write(false);
        seq.set_write(true);

        for _ in 0..5 {
            seq.capture(CaptureEvent {
                params: &params,
                held: None,
            });
        }
        assert_eq!(seq.write_count(), 0);
        assert_eq!(seq.selected(), None);
    }

    #[test]
    fn param_change_without_single_note_writes_rest() {
        let params = SignalGraphParams::default();
        let mut seq = StepSequencer::new(120.0);
        seq.set_slot(1, step(NoteId::D));
        seq.set_write(true);
        seq.select_step(1);
        seq.capture(CaptureEvent {
            params: &params,
            held: None,
        });
        assert!(seq.slot(1).unwrap().is_rest());
    }

    #[test]
    fn snapshot_keeps_every_param() {
        let params = SignalGraphParams {
            reverb: 42.0,
            pitch_shift: -5.0,
            ..SignalGraphParams::default()
        };
        let mut seq = StepSequencer::new(120.0);
        seq.set_write(true);
        seq.select_step(0);
        seq.capture(CaptureEvent {
            params: &params,
            held: Some((NoteId::C, 4, 80)),
        });
        assert_eq!(seq.slot(0).unwrap().note().unwrap().params, params);
    }

    #[test]
    fn selection_out_of_range_is_ignored() {
        let mut seq = StepSequencer::new(120.0);
        assert!(!seq.select_step(STEPS_PER_PATTERN));
        assert_eq!(seq.selected(), None);
    }

    #[test]
    fn clear_helpers() {
        let mut seq = StepSequencer::new(120.0);
        seq.set_slot(0, step(NoteId::C));
        seq.set_slot(3, step(NoteId::F));
        seq.clear_step(0);
        assert!(seq.slot(0).unwrap().is_rest());
        seq.clear_pattern();
        assert!(seq.slots().iter().all(StepSlot::is_rest));
    }
}
