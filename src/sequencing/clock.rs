//! Drift-corrected step clock shared by both sequencers.

use std::time::{Duration, Instant};

/*
Step Clock
==========

A tick is due every `60 / tempo` seconds. Deadlines are computed from a
fixed anchor rather than from the previous tick, so jitter in when `poll`
happens to run never accumulates:

    anchor        +1·p          +2·p          +3·p
      │─────────────│─────────────│─────────────│
      start         tick          tick          tick
                      ↑ polled late: the next deadline is still anchor + 2·p

`poll(now)` yields at most one tick per call. If the caller falls more than
a whole period behind (a stalled control thread), the missed ticks are
dropped and the schedule restarts from `now` instead of firing a burst.

Every tick reports the step that was current *before* advancing (the one
to play) and the step after advancing (the one to display). The first
tick after start therefore plays step 0 and displays step 1.
*/

pub const MIN_TEMPO_BPM: f64 = 20.0;
pub const MAX_TEMPO_BPM: f64 = 300.0;

/// One clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Step whose contents sound on this tick (pre-advance index).
    pub played: usize,
    /// Step shown as current after this tick.
    pub display: usize,
}

#[derive(Debug, Clone)]
pub struct StepClock {
    steps: usize,
    tempo_bpm: f64,
    step: usize,
    running: bool,
    anchor: Instant,
    ticks_since_anchor: u64,
}

impl StepClock {
    pub fn new(tempo_bpm: f64, steps: usize) -> Self {
        Self {
            steps: steps.max(1),
            tempo_bpm: clamp_tempo(tempo_bpm),
            step: 0,
            running: false,
            anchor: Instant::now(),
            ticks_since_anchor: 0,
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(60.0 / self.tempo_bpm)
    }

    pub fn tempo(&self) -> f64 {
        self.tempo_bpm
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Step shown as current.
    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin ticking from step 0; the first tick falls one period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.step = 0;
        self.running = true;
        self.reanchor(now);
    }

    /// Stop ticking and rewind to step 0.
    pub fn stop(&mut self) {
        self.running = false;
        self.step = 0;
    }

    /// Change tempo (clamped to 20-300 BPM). A running clock re-anchors at `now`.
    pub fn set_tempo(&mut self, tempo_bpm: f64, now: Instant) {
        self.tempo_bpm = clamp_tempo(tempo_bpm);
        if self.running {
            self.reanchor(now);
        }
    }

    /// When the next tick is due, if running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.running.then(|| self.deadline(self.ticks_since_anchor + 1))
    }

    pub fn poll(&mut self, now: Instant) -> Option<Tick> {
        if !self.running {
            return None;
        }

        let due = self.deadline(self.ticks_since_anchor + 1);
        if now < due {
            return None;
        }

        let late = now.duration_since(due);
        if late > self.period() {
            let missed = (late.as_secs_f64() / self.period().as_secs_f64()) as u64;
            tracing::warn!(missed, ?late, "step clock fell behind, re-anchoring");
            self.reanchor(now);
        } else {
            self.ticks_since_anchor += 1;
        }

        let played = self.step;
        self.step = (self.step + 1) % self.steps;
        Some(Tick {
            played,
            display: self.step,
        })
    }

    fn deadline(&self, tick: u64) -> Instant {
        self.anchor + Duration::from_secs_f64(60.0 / self.tempo_bpm * tick as f64)
    }

    fn reanchor(&mut self, now: Instant) {
        self.anchor = now;
        self.ticks_since_anchor = 0;
    }
}

fn clamp_tempo(tempo_bpm: f64) -> f64 {
    if tempo_bpm.is_finite() {
        tempo_bpm.clamp(MIN_TEMPO_BPM, MAX_TEMPO_BPM)
    } else {
        120.0
    }
}
