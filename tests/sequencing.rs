use std::time::{Duration, Instant};

use stepsynth::drums::SynthKit;
use stepsynth::io::OfflineSink;
use stepsynth::params::randomize::{random_range, Randomizer};
use stepsynth::sequencing::{StepNote, StepSlot};
use stepsynth::{
    AudioEngine, EngineConfig, NoteId, ParamId, SignalGraphParams, VoiceError, MAX_POLYPHONY,
};

fn engine() -> AudioEngine {
    AudioEngine::new(EngineConfig::default(), SynthKit::new())
}

fn note_step(note: NoteId) -> StepSlot {
    StepSlot::Note(StepNote {
        note,
        octave: 4,
        velocity: 80,
        params: SignalGraphParams::default(),
    })
}

#[test]
fn fifth_note_is_rejected_and_held_set_is_unchanged() {
    let mut engine = engine();
    for note in [NoteId::C, NoteId::D, NoteId::E, NoteId::F] {
        engine.note_on(note, 4, 80).expect("within polyphony");
    }
    let err = engine.note_on(NoteId::G, 4, 80).unwrap_err();
    assert_eq!(err, VoiceError::CapacityExceeded { limit: MAX_POLYPHONY });
    assert_eq!(engine.held_voices().len(), MAX_POLYPHONY);
    assert!(engine.held_voices().iter().all(|v| v.note != NoteId::G));
}

#[test]
fn note_on_then_off_restores_held_set() {
    let mut engine = engine();
    engine.note_on(NoteId::C, 3, 80).expect("voice");
    for note in NoteId::ALL.into_iter().filter(|&n| n != NoteId::C) {
        let before: Vec<NoteId> = engine.held_voices().iter().map(|v| v.note).collect();
        engine.note_on(note, 4, 60).expect("voice");
        engine.note_off(note).expect("was held");
        let after: Vec<NoteId> = engine.held_voices().iter().map(|v| v.note).collect();
        assert_eq!(before, after, "{note}");
    }
}

#[test]
fn oscillator_gains_sum_to_velocity_level_for_any_mix() {
    let mut engine = engine();
    for (i, mix) in [0.0, 0.1, 0.37, 0.5, 0.9, 1.0].into_iter().enumerate() {
        engine.set_scalar(ParamId::OscMix, mix);
        let velocity = 20 + 15 * i as u8;
        let voice = engine.note_on(NoteId::A, 4, velocity).expect("voice");
        let expected = velocity as f32 / 100.0;
        assert!(
            (voice.output_gain() - expected).abs() < 1e-5,
            "mix {mix}: {} != {expected}",
            voice.output_gain()
        );
        engine.note_off(NoteId::A);
    }
}

#[test]
fn pattern_plays_note_rest_note_on_consecutive_ticks() {
    let mut engine = engine();
    engine.set_step(0, note_step(NoteId::A));
    engine.set_step(2, note_step(NoteId::B));

    let t0 = Instant::now();
    engine.start_sequencer(t0);
    let tick = |n: u64| t0 + Duration::from_millis(500 * n);

    let first = engine.tick(tick(1)).melodic.expect("tick due");
    assert_eq!(first.play.map(|s| s.note), Some(NoteId::A));
    assert_eq!(engine.held_voices()[0].note, NoteId::A);

    let second = engine.tick(tick(2)).melodic.expect("tick due");
    assert!(second.play.is_none());
    assert!(engine.held_voices().is_empty());

    let third = engine.tick(tick(3)).melodic.expect("tick due");
    assert_eq!(third.play.map(|s| s.note), Some(NoteId::B));
    assert_eq!(engine.step_sequencer().current_step(), 3);
}

#[test]
fn toggling_write_back_on_records_nothing_until_a_step_is_selected() {
    let mut engine = engine();
    engine.set_write(true);
    engine.select_step(1);
    engine.set_write(false);
    engine.set_write(true);

    engine.note_on(NoteId::E, 4, 80).expect("voice");
    engine.set_scalar(ParamId::Reverb, 30.0);
    assert!(engine.step_sequencer().slots().iter().all(StepSlot::is_rest));
    assert_eq!(engine.step_sequencer().write_count(), 0);
}

#[test]
fn randomize_stays_inside_declared_ranges() {
    let mut engine = engine().with_randomizer(Randomizer::seeded(42));
    for _ in 0..50 {
        let params = engine.randomize().clone();
        for id in ParamId::ALL {
            let (min, max) = random_range(id);
            let value = params.get(id);
            assert!((min..=max).contains(&value), "{id:?} = {value}");
        }
        assert_eq!(params.pitch_shift.fract(), 0.0);
    }
}

#[test]
fn drum_grid_fires_rows_on_their_steps() {
    let mut engine = engine();
    let mut sink = OfflineSink::new(48_000, 1);
    engine.attach(&mut sink).expect("offline sink always starts");
    engine.toggle_drum(0, 0);
    engine.toggle_drum(2, 0);
    engine.toggle_drum(1, 1);

    let t0 = Instant::now();
    engine.start_drums(t0);
    let first = engine.tick(t0 + Duration::from_millis(500)).drums.expect("tick due");
    assert_eq!(first.rows, vec![0, 2]);
    let second = engine.tick(t0 + Duration::from_millis(1_000)).drums.expect("tick due");
    assert_eq!(second.rows, vec![1]);

    let samples = sink.render_mono_secs(0.05);
    assert!(samples.iter().any(|s| s.abs() > 0.01));
}
