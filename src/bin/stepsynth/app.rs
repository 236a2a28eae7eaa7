//! Application state and the main loop.

use std::fs;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;

use stepsynth::capture::CaptureOutcome;
use stepsynth::params::{OscSlot, ParamChange};
use stepsynth::synth::manager::DEFAULT_VELOCITY;
use stepsynth::{AudioEngine, NoteId, Origin, ParamId, STEPS_PER_PATTERN};

use super::keys::{self, Action};
use super::ui;

/// Terminals rarely report key releases, so a played key is held for this
/// long and extended by auto-repeat.
const KEY_GATE: Duration = Duration::from_millis(350);
/// Redraw interval (~60 fps).
const FRAME: Duration = Duration::from_millis(16);
const TEMPO_STEP: f64 = 5.0;

pub struct App {
    engine: AudioEngine,
    octave: i32,
    velocity: u8,
    param_cursor: usize,
    drum_row: usize,
    drum_step: usize,
    gates: Vec<(NoteId, Instant)>,
    takes: u32,
    status: String,
    scope: Vec<f32>,
    should_quit: bool,
}

impl App {
    pub fn new(engine: AudioEngine) -> Self {
        Self {
            engine,
            octave: 4,
            velocity: DEFAULT_VELOCITY,
            param_cursor: 0,
            drum_row: 0,
            drum_step: 0,
            gates: Vec::new(),
            takes: 0,
            status: String::from("ready"),
            scope: Vec::new(),
            should_quit: false,
        }
    }

    pub fn engine(&self) -> &AudioEngine {
        &self.engine
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn param_cursor(&self) -> usize {
        self.param_cursor
    }

    pub fn drum_cursor(&self) -> (usize, usize) {
        (self.drum_row, self.drum_step)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn scope(&self) -> &[f32] {
        &self.scope
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            let now = Instant::now();
            self.engine.tick(now);
            self.release_gates(now);
            self.engine.pump();
            self.collect_takes();

            self.scope.clear();
            self.scope.extend_from_slice(self.engine.scope());

            terminal.draw(|frame| ui::render(frame, self))?;

            let timeout = self
                .engine
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()).min(FRAME))
                .unwrap_or(FRAME);
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Release {
                        if let Some(action) = keys::action_for(key) {
                            self.handle(action, Instant::now());
                        }
                    }
                }
            }
        }

        self.finish_recording();
        Ok(())
    }

    fn handle(&mut self, action: Action, now: Instant) {
        match action {
            Action::Note(note) => self.play(note, now),
            Action::OctaveDown => self.octave = (self.octave - 1).max(0),
            Action::OctaveUp => self.octave = (self.octave + 1).min(8),
            Action::ParamPrev => {
                self.param_cursor = (self.param_cursor + ParamId::COUNT - 1) % ParamId::COUNT
            }
            Action::ParamNext => self.param_cursor = (self.param_cursor + 1) % ParamId::COUNT,
            Action::ParamDecrease => self.nudge(-1.0),
            Action::ParamIncrease => self.nudge(1.0),
            Action::CycleWaveform1 => self.cycle_waveform(OscSlot::Primary),
            Action::CycleWaveform2 => self.cycle_waveform(OscSlot::Secondary),
            Action::ToggleSecondOscillator => {
                let enabled = !self.engine.params().second_oscillator;
                self.engine
                    .set_param(ParamChange::SecondOscillator(enabled), Origin::Performance);
            }
            Action::Randomize => {
                self.engine.randomize();
                self.status = String::from("randomized");
            }
            Action::ToggleSequencer => {
                self.engine.toggle_sequencer(now);
            }
            Action::ToggleDrums => {
                self.engine.toggle_drums(now);
            }
            Action::ToggleWrite => {
                let enabled = !self.engine.step_sequencer().write_enabled();
                self.engine.set_write(enabled);
            }
            Action::SelectStep(index) => {
                self.engine.select_step(index);
            }
            Action::ClearStep => {
                if let Some(index) = self.engine.step_sequencer().selected() {
                    self.engine.clear_step(index);
                }
            }
            Action::ClearPattern => self.engine.clear_pattern(),
            Action::TempoDown | Action::TempoUp => {
                let delta = if action == Action::TempoUp { TEMPO_STEP } else { -TEMPO_STEP };
                let tempo = self.engine.step_sequencer().tempo() + delta;
                self.engine.set_tempo(tempo, now);
            }
            Action::DrumTempoDown | Action::DrumTempoUp => {
                let delta = if action == Action::DrumTempoUp { TEMPO_STEP } else { -TEMPO_STEP };
                let tempo = self.engine.drum_sequencer().tempo() + delta;
                self.engine.set_drum_tempo(tempo, now);
            }
            Action::DrumRowNext => {
                let rows = self.engine.drum_sequencer().pattern().row_count().max(1);
                self.drum_row = (self.drum_row + 1) % rows;
            }
            Action::DrumStepPrev => {
                self.drum_step = (self.drum_step + STEPS_PER_PATTERN - 1) % STEPS_PER_PATTERN;
            }
            Action::DrumStepNext => self.drum_step = (self.drum_step + 1) % STEPS_PER_PATTERN,
            Action::DrumToggleCell => {
                self.engine.toggle_drum(self.drum_row, self.drum_step);
            }
            Action::ToggleRecording => self.toggle_recording(),
            Action::Panic => {
                self.gates.clear();
                self.engine.panic();
                self.status = String::from("panic: all sound stopped");
            }
            Action::Quit => self.should_quit = true,
        }
    }

    fn play(&mut self, note: NoteId, now: Instant) {
        if let Some(gate) = self.gates.iter_mut().find(|(held, _)| *held == note) {
            gate.1 = now + KEY_GATE;
            return;
        }
        match self.engine.note_on(note, self.octave, self.velocity) {
            Ok(_) => self.gates.push((note, now + KEY_GATE)),
            Err(err) => self.status = err.to_string(),
        }
    }

    fn release_gates(&mut self, now: Instant) {
        let engine = &mut self.engine;
        self.gates.retain(|&(note, until)| {
            if now >= until {
                engine.note_off(note);
                false
            } else {
                true
            }
        });
    }

    fn nudge(&mut self, direction: f32) {
        let id = ParamId::ALL[self.param_cursor];
        let value = self.engine.params().get(id) + direction * id.step();
        self.engine.set_scalar(id, value);
    }

    fn cycle_waveform(&mut self, slot: OscSlot) {
        let next = self.engine.params().waveform(slot).next();
        self.engine
            .set_param(ParamChange::Waveform(slot, next), Origin::Performance);
    }

    fn toggle_recording(&mut self) {
        let result = if self.engine.is_capturing() {
            self.engine.stop_capture().map(|()| "encoding take...")
        } else {
            self.engine.start_capture().map(|()| "recording")
        };
        self.status = match result {
            Ok(message) => message.to_string(),
            Err(err) => err.to_string(),
        };
    }

    fn collect_takes(&mut self) {
        while let Some(outcome) = self.engine.poll_capture() {
            self.save_take(outcome);
        }
    }

    fn save_take(&mut self, outcome: CaptureOutcome) {
        self.takes += 1;
        self.status = match outcome {
            CaptureOutcome::Finished(recording) => {
                let path = format!("take-{}.wav", self.takes);
                match recording.save(&path) {
                    Ok(()) => format!("saved {path} ({:.1}s)", recording.duration_secs()),
                    Err(err) => format!("could not save {path}: {err}"),
                }
            }
            CaptureOutcome::DecodeFailed { error, container } => {
                let path = format!("take-{}.raw", self.takes);
                match fs::write(&path, &container) {
                    Ok(()) => format!("{error}; raw audio kept in {path}"),
                    Err(err) => format!("{error}; could not keep raw audio: {err}"),
                }
            }
            CaptureOutcome::EncodeFailed(error) => error.to_string(),
        };
    }

    /// Don't lose a take that was still recording at quit.
    fn finish_recording(&mut self) {
        if self.engine.is_capturing() && self.engine.stop_capture().is_ok() {
            while let Some(outcome) = self.engine.wait_capture() {
                self.save_take(outcome);
            }
        }
    }
}
