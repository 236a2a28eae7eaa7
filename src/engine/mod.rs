//! The engine context: one owned object tying every component together.
//!
//! [`AudioEngine`] lives on the control thread. It owns the parameter store,
//! the voice manager, both sequencers and the capture session, and talks to
//! the real-time [`AudioProcessor`] only through lock-free channels:
//!
//! ```text
//!   keys / knobs / sequencer ticks
//!              │
//!              ▼
//!   AudioEngine ──SynthMessage queue──▶ AudioProcessor ──▶ AudioSink
//!        │  └──────ParamSlots (atomics)──────▲     │
//!        │                                         ├──▶ scope ring
//!        ◀───────────── capture ring ──────────────┘
//! ```
//!
//! Every parameter mutation, whether it comes from a key, the randomizer or
//! sequencer playback, goes through the same entry point and produces one
//! [`ParamChanged`] event. That event updates the graph and, for performance
//! events only, feeds step write capture.

pub mod event;
pub mod processor;

use std::sync::Arc;
use std::time::Instant;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::capture::{capture_tap, CaptureOutcome, CaptureReader, CaptureSession, CaptureWorker};
use crate::config::EngineConfig;
use crate::drums::{DrumPlayer, SampleSource};
use crate::dsp::noise::NoiseColor;
use crate::error::{CaptureError, SinkError, VoiceError};
use crate::io::scope::{scope_tap, ScopeReader};
use crate::io::sink::AudioSink;
use crate::params::randomize::Randomizer;
use crate::params::{OscSlot, ParamChange, ParamId, ParamSlots, SignalGraphParams};
use crate::sequencing::{CaptureEvent, DrumPattern, DrumSequencer, StepSequencer, StepSlot};
use crate::synth::manager::{Voice, VoiceManager};
use crate::synth::message::{CommandSink, SynthMessage};
use crate::synth::note::NoteId;

pub use event::{Origin, ParamChanged, TickReport};
pub use processor::AudioProcessor;

fn noise_param(color: NoiseColor) -> ParamId {
    match color {
        NoiseColor::White => ParamId::WhiteNoise,
        NoiseColor::Pink => ParamId::PinkNoise,
        NoiseColor::Brown => ParamId::BrownNoise,
    }
}

fn noise_color(id: ParamId) -> Option<NoiseColor> {
    match id {
        ParamId::WhiteNoise => Some(NoiseColor::White),
        ParamId::PinkNoise => Some(NoiseColor::Pink),
        ParamId::BrownNoise => Some(NoiseColor::Brown),
        _ => None,
    }
}

/// Control-side handles that only exist once a sink is running.
struct AudioLink {
    sample_rate: u32,
    scope: ScopeReader,
    capture: CaptureReader,
}

pub struct AudioEngine {
    config: EngineConfig,
    params: SignalGraphParams,
    slots: Arc<ParamSlots>,
    voices: VoiceManager,
    commands: Producer<SynthMessage>,
    /// Receiving end of the queue until a sink takes over; drained and dropped.
    detached: Option<Consumer<SynthMessage>>,
    kit: Box<dyn SampleSource>,
    link: Option<AudioLink>,
    step: StepSequencer,
    drums: DrumSequencer,
    randomizer: Randomizer,
    session: Option<CaptureSession>,
    worker: CaptureWorker,
    closed: bool,
}

impl AudioEngine {
    pub fn new(config: EngineConfig, kit: impl SampleSource + 'static) -> Self {
        let config = config.sanitized();
        let params = SignalGraphParams {
            second_oscillator: config.second_oscillator,
            ..SignalGraphParams::default()
        };
        let (commands, detached) = RingBuffer::new(config.command_capacity);

        Self {
            slots: Arc::new(ParamSlots::new(&params)),
            voices: VoiceManager::new(&params),
            step: StepSequencer::new(config.tempo_bpm),
            drums: DrumSequencer::new(DrumPattern::default(), config.drum_tempo_bpm),
            randomizer: Randomizer::new(),
            params,
            commands,
            detached: Some(detached),
            kit: Box::new(kit),
            link: None,
            session: None,
            worker: CaptureWorker::new(),
            closed: false,
            config,
        }
    }

    /// Replace the randomizer, e.g. with a seeded one for reproducible runs.
    pub fn with_randomizer(mut self, randomizer: Randomizer) -> Self {
        self.randomizer = randomizer;
        self
    }

    /// Replace the drum grid. Must happen before [`attach`](Self::attach),
    /// which resolves one sample per row.
    pub fn with_drum_pattern(mut self, pattern: DrumPattern) -> Self {
        let tempo = self.drums.tempo();
        self.drums = DrumSequencer::new(pattern, tempo);
        self
    }

    /// Build an [`AudioProcessor`] matching `sink`'s format and start it.
    pub fn attach(&mut self, sink: &mut (impl AudioSink + ?Sized)) -> Result<(), SinkError> {
        if self.link.is_some() {
            return Err(SinkError::AlreadyStarted);
        }

        let sample_rate = sink.sample_rate();
        let (producer, consumer) = RingBuffer::new(self.config.command_capacity);
        let drums = DrumPlayer::new(
            self.kit.as_ref(),
            self.drums.pattern().rows().iter().map(|row| row.name.as_str()),
            sample_rate,
        );
        let (scope_tap, scope) = scope_tap(self.config.scope_window);
        let capture_capacity = (self.config.capture_ring_seconds * sample_rate as f32) as usize
            * self.config.capture_channels as usize;
        let (capture_tap, capture) = capture_tap(capture_capacity, self.config.capture_channels);

        let processor = AudioProcessor::new(
            sample_rate as f32,
            consumer,
            self.slots.clone(),
            drums,
            scope_tap,
            capture_tap,
        );
        sink.start(processor)?;

        // Anything queued before this point was never heard; start clean.
        self.commands = producer;
        self.detached = None;
        self.voices.all_notes_off(&mut Vec::new());
        for color in NoiseColor::ALL {
            if self.params.get(noise_param(color)) > 0.0 {
                self.commands.send(SynthMessage::NoiseStart(color));
            }
        }

        self.link = Some(AudioLink {
            sample_rate,
            scope,
            capture,
        });
        tracing::info!(sample_rate, channels = sink.channels(), "engine attached to audio output");
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.link.is_some()
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.link.as_ref().map(|link| link.sample_rate)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn params(&self) -> &SignalGraphParams {
        &self.params
    }

    pub fn held_voices(&self) -> &[Voice] {
        self.voices.held()
    }

    // ---------------------------------------------------------------- notes

    /// Start a note from live input. Velocity is on a 0-100 scale.
    pub fn note_on(
        &mut self,
        note: NoteId,
        octave: i32,
        velocity: u8,
    ) -> Result<Voice, VoiceError> {
        let voice = match self.voices.note_on(note, octave, velocity, &mut self.commands) {
            Ok(voice) => voice.clone(),
            Err(err) => {
                tracing::debug!(%err, "note rejected");
                return Err(err);
            }
        };
        if self.voices.held_count() == 1 {
            self.capture_step();
        }
        Ok(voice)
    }

    pub fn note_on_named(
        &mut self,
        name: &str,
        octave: i32,
        velocity: u8,
    ) -> Result<Voice, VoiceError> {
        let note = name.parse::<NoteId>().inspect_err(|err| {
            tracing::debug!(%err, "note rejected");
        })?;
        self.note_on(note, octave, velocity)
    }

    pub fn note_off(&mut self, note: NoteId) -> Option<Voice> {
        self.voices.note_off(note, &mut self.commands)
    }

    pub fn all_notes_off(&mut self) -> usize {
        self.voices.all_notes_off(&mut self.commands)
    }

    // ----------------------------------------------------------- parameters

    /// The single entry point for parameter mutation. Returns the change as
    /// stored, after clamping.
    pub fn set_param(&mut self, change: ParamChange, origin: Origin) -> ParamChange {
        self.emit(ParamChanged::new(change, origin))
    }

    /// Shorthand for a scalar performance edit. Returns the stored value.
    pub fn set_scalar(&mut self, id: ParamId, value: f32) -> f32 {
        match self.set_param(ParamChange::Scalar(id, value), Origin::Performance) {
            ParamChange::Scalar(_, stored) => stored,
            _ => self.params.get(id),
        }
    }

    /// Apply every field of `snapshot` as individual changes.
    pub fn apply_snapshot(&mut self, snapshot: &SignalGraphParams, origin: Origin) {
        for change in snapshot.changes() {
            self.emit(ParamChanged::new(change, origin));
        }
    }

    /// Replace the patch with random values. Counts as a performance edit.
    pub fn randomize(&mut self) -> &SignalGraphParams {
        let next = self.randomizer.generate(&self.params);
        self.apply_snapshot(&next, Origin::Performance);
        tracing::debug!("parameters randomized");
        &self.params
    }

    fn emit(&mut self, event: ParamChanged) -> ParamChange {
        let stored = self.write_param(event.change);
        if event.origin == Origin::Performance {
            self.capture_step();
        }
        stored
    }

    fn write_param(&mut self, change: ParamChange) -> ParamChange {
        let previous = match change {
            ParamChange::Scalar(id, _) => self.params.get(id),
            _ => 0.0,
        };
        let stored = self.params.apply(change);

        match stored {
            ParamChange::Scalar(id, value) => {
                self.slots.store(id, value);
                match id {
                    ParamId::OscMix => self.voices.set_mix(value, &mut self.commands),
                    ParamId::Detune1 => self.voices.set_detune(OscSlot::Primary, value),
                    ParamId::Detune2 => self.voices.set_detune(OscSlot::Secondary, value),
                    _ => {}
                }
                if let Some(color) = noise_color(id) {
                    if previous <= 0.0 && value > 0.0 {
                        self.commands.send(SynthMessage::NoiseStart(color));
                    } else if previous > 0.0 && value <= 0.0 {
                        self.commands.send(SynthMessage::NoiseStop(color));
                    }
                }
            }
            ParamChange::Waveform(slot, waveform) => {
                self.voices.set_waveform(slot, waveform, &mut self.commands)
            }
            ParamChange::SecondOscillator(enabled) => self.voices.set_second_oscillator(enabled),
        }
        stored
    }

    fn capture_step(&mut self) {
        let held = self
            .voices
            .single_held()
            .map(|voice| (voice.note, voice.octave, voice.velocity));
        self.step.capture(CaptureEvent {
            params: &self.params,
            held,
        });
    }

    // ------------------------------------------------------------ sequencers

    pub fn step_sequencer(&self) -> &StepSequencer {
        &self.step
    }

    pub fn drum_sequencer(&self) -> &DrumSequencer {
        &self.drums
    }

    pub fn start_sequencer(&mut self, now: Instant) {
        self.step.start(now);
    }

    /// Stop playback and release the note it left sounding.
    pub fn stop_sequencer(&mut self) {
        if let Some(note) = self.step.stop() {
            self.voices.note_off(note, &mut self.commands);
        }
    }

    /// Returns whether the sequencer is now running.
    pub fn toggle_sequencer(&mut self, now: Instant) -> bool {
        if self.step.is_running() {
            self.stop_sequencer();
        } else {
            self.start_sequencer(now);
        }
        self.step.is_running()
    }

    pub fn set_tempo(&mut self, tempo_bpm: f64, now: Instant) {
        self.step.set_tempo(tempo_bpm, now);
    }

    pub fn set_write(&mut self, enabled: bool) {
        self.step.set_write(enabled);
        tracing::debug!(enabled, "step write mode");
    }

    pub fn select_step(&mut self, index: usize) -> bool {
        self.step.select_step(index)
    }

    pub fn clear_step(&mut self, index: usize) -> bool {
        self.step.clear_step(index)
    }

    /// Overwrite one step directly, bypassing write capture.
    pub fn set_step(&mut self, index: usize, slot: StepSlot) -> bool {
        self.step.set_slot(index, slot)
    }

    pub fn clear_pattern(&mut self) {
        self.step.clear_pattern();
    }

    pub fn start_drums(&mut self, now: Instant) {
        self.drums.start(now);
    }

    pub fn stop_drums(&mut self) {
        self.drums.stop();
    }

    pub fn toggle_drums(&mut self, now: Instant) -> bool {
        if self.drums.is_running() {
            self.drums.stop();
        } else {
            self.drums.start(now);
        }
        self.drums.is_running()
    }

    pub fn set_drum_tempo(&mut self, tempo_bpm: f64, now: Instant) {
        self.drums.set_tempo(tempo_bpm, now);
    }

    pub fn toggle_drum(&mut self, row: usize, step: usize) -> Option<bool> {
        self.drums.pattern_mut().toggle(row, step)
    }

    pub fn clear_drum_row(&mut self, row: usize) -> bool {
        self.drums.pattern_mut().clear_row(row)
    }

    /// Fire one drum row right away, outside the grid.
    pub fn trigger_drum(&mut self, row: usize) {
        if row < self.drums.pattern().row_count() {
            self.commands.send(SynthMessage::TriggerDrum { row });
        }
    }

    /// Run whatever sequencer ticks are due at `now`.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport::default();

        if let Some(action) = self.step.tick(now) {
            if let Some(note) = action.release {
                self.voices.note_off(note, &mut self.commands);
            }
            if let Some(step) = &action.play {
                self.apply_snapshot(&step.params, Origin::Sequencer);
                if let Err(err) =
                    self.voices
                        .note_on(step.note, step.octave, step.velocity, &mut self.commands)
                {
                    tracing::debug!(%err, step = action.tick.played, "sequenced note rejected");
                    self.step.clear_gate();
                }
            }
            report.melodic = Some(action);
        }

        if let Some(hits) = self.drums.tick(now) {
            for &row in &hits.rows {
                self.commands.send(SynthMessage::TriggerDrum { row });
            }
            report.drums = Some(hits);
        }

        report
    }

    /// Earliest pending sequencer deadline, for sleeping precisely.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.step.next_deadline(), self.drums.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // --------------------------------------------------------------- capture

    /// Start recording the master output. A running session is replaced.
    pub fn start_capture(&mut self) -> Result<(), CaptureError> {
        let Some(link) = self.link.as_mut() else {
            tracing::warn!("capture requested before audio output is running");
            return Err(CaptureError::DeviceUnavailable);
        };
        if self.session.is_some() {
            tracing::info!("replacing active capture session");
        }
        link.capture.arm();
        self.session = Some(CaptureSession::new(
            link.sample_rate,
            self.config.capture_channels,
        ));
        tracing::info!(
            sample_rate = link.sample_rate,
            channels = self.config.capture_channels,
            "capture started"
        );
        Ok(())
    }

    /// Finish the session and hand it to the background encoder. The result
    /// arrives through [`poll_capture`](Self::poll_capture). If the take
    /// cannot be finalized the session stays open (disarmed) for a retry or
    /// [`abandon_capture`](Self::abandon_capture).
    pub fn stop_capture(&mut self) -> Result<(), CaptureError> {
        let Some(mut session) = self.session.take() else {
            return Err(CaptureError::NotRecording);
        };
        if let Some(link) = self.link.as_mut() {
            link.capture.disarm();
            while let Some(chunk) = link.capture.take_chunk() {
                session.push_chunk(chunk);
            }
        }

        let frames = session.frames();
        let container = match session.finalize() {
            Ok(container) => container,
            Err(err) => {
                // Keep the take; the caller can retry or recover the chunks.
                tracing::warn!(%err, frames, "could not finalize capture");
                self.session = Some(session);
                return Err(err.into());
            }
        };
        self.worker.submit(container);
        tracing::info!(frames, "capture stopped, encoding");
        Ok(())
    }

    /// Drop the open session without encoding it and hand back its raw
    /// interleaved chunks. Recording stops.
    pub fn abandon_capture(&mut self) -> Option<Vec<Vec<f32>>> {
        let session = self.session.take()?;
        if let Some(link) = self.link.as_mut() {
            link.capture.disarm();
        }
        tracing::info!(frames = session.frames(), "capture abandoned");
        Some(session.into_chunks())
    }

    pub fn is_capturing(&self) -> bool {
        self.session.is_some()
    }

    /// Non-blocking: a finished capture job, if one is ready.
    pub fn poll_capture(&mut self) -> Option<CaptureOutcome> {
        let outcome = self.worker.poll()?;
        log_outcome(&outcome);
        Some(outcome)
    }

    /// Block until the next capture job finishes. `None` if none is pending.
    pub fn wait_capture(&mut self) -> Option<CaptureOutcome> {
        let outcome = self.worker.wait()?;
        log_outcome(&outcome);
        Some(outcome)
    }

    /// Move recorded audio off the capture ring. Call regularly (every UI
    /// frame is plenty) so the ring never fills.
    pub fn pump(&mut self) {
        if let Some(detached) = self.detached.as_mut() {
            while detached.pop().is_ok() {}
        }

        let (Some(session), Some(link)) = (self.session.as_mut(), self.link.as_mut()) else {
            return;
        };
        if let Some(chunk) = link.capture.take_chunk() {
            session.push_chunk(chunk);
        }
        let dropped = link.capture.take_dropped();
        if dropped > 0 {
            tracing::warn!(dropped, "capture ring overflowed, frames lost");
        }
    }

    /// The latest visualizer window; empty until attached.
    pub fn scope(&mut self) -> &[f32] {
        match self.link.as_mut() {
            Some(link) => link.scope.poll(),
            None => &[],
        }
    }

    // -------------------------------------------------------------- teardown

    /// Stop everything at once: sequencers, voices, noise, drums and tails.
    pub fn panic(&mut self) {
        self.stop_sequencer();
        self.drums.stop();
        self.voices.all_notes_off(&mut self.commands);
        for color in NoiseColor::ALL {
            let id = noise_param(color);
            if self.params.get(id) > 0.0 {
                self.write_param(ParamChange::Scalar(id, 0.0));
            }
        }
        self.commands.send(SynthMessage::Panic);
        tracing::info!("all sound stopped");
    }

    /// Release every resource the engine holds a claim on. Runs on drop.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.panic();
        if self.abandon_capture().is_some() {
            tracing::warn!("capture session abandoned at shutdown");
        }
        tracing::info!("engine shut down");
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn log_outcome(outcome: &CaptureOutcome) {
    match outcome {
        CaptureOutcome::Finished(recording) => tracing::info!(
            seconds = recording.duration_secs(),
            bytes = recording.wav.len(),
            "capture encoded"
        ),
        CaptureOutcome::DecodeFailed { error, container } => {
            tracing::warn!(%error, bytes = container.len(), "capture could not be decoded")
        }
        CaptureOutcome::EncodeFailed(error) => {
            tracing::warn!(%error, "capture could not be encoded")
        }
    }
}
