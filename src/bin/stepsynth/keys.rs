//! Keyboard layout.
//!
//! The home row is a piano, the row above holds the black keys:
//!
//! ```text
//!    w e   t y u
//!   a s d f g h j
//!   C D E F G A B
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use stepsynth::NoteId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Note(NoteId),
    OctaveDown,
    OctaveUp,
    ParamPrev,
    ParamNext,
    ParamDecrease,
    ParamIncrease,
    CycleWaveform1,
    CycleWaveform2,
    ToggleSecondOscillator,
    Randomize,
    ToggleSequencer,
    ToggleDrums,
    ToggleWrite,
    SelectStep(usize),
    ClearStep,
    ClearPattern,
    TempoDown,
    TempoUp,
    DrumTempoDown,
    DrumTempoUp,
    DrumRowNext,
    DrumStepPrev,
    DrumStepNext,
    DrumToggleCell,
    ToggleRecording,
    Panic,
    Quit,
}

fn note_for(c: char) -> Option<NoteId> {
    let note = match c {
        'a' => NoteId::C,
        'w' => NoteId::Cs,
        's' => NoteId::D,
        'e' => NoteId::Ds,
        'd' => NoteId::E,
        'f' => NoteId::F,
        't' => NoteId::Fs,
        'g' => NoteId::G,
        'y' => NoteId::Gs,
        'h' => NoteId::A,
        'u' => NoteId::As,
        'j' => NoteId::B,
        _ => return None,
    };
    Some(note)
}

pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    if let KeyCode::Char(c) = key.code {
        if let Some(note) = note_for(c) {
            return Some(Action::Note(note));
        }
    }

    let action = match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char(c @ '1'..='8') => Action::SelectStep(c as usize - '1' as usize),
        KeyCode::Char('z') => Action::OctaveDown,
        KeyCode::Char('x') => Action::OctaveUp,
        KeyCode::Up => Action::ParamPrev,
        KeyCode::Down => Action::ParamNext,
        KeyCode::Left => Action::ParamDecrease,
        KeyCode::Right => Action::ParamIncrease,
        KeyCode::Char('k') => Action::CycleWaveform1,
        KeyCode::Char('l') => Action::CycleWaveform2,
        KeyCode::Char('o') => Action::ToggleSecondOscillator,
        KeyCode::Char('n') => Action::Randomize,
        KeyCode::Char(' ') => Action::ToggleSequencer,
        KeyCode::Char('b') => Action::ToggleDrums,
        KeyCode::Char('v') => Action::ToggleWrite,
        KeyCode::Char('c') => Action::ClearStep,
        KeyCode::Char('C') => Action::ClearPattern,
        KeyCode::Char('-') => Action::TempoDown,
        KeyCode::Char('=') => Action::TempoUp,
        KeyCode::Char('_') => Action::DrumTempoDown,
        KeyCode::Char('+') => Action::DrumTempoUp,
        KeyCode::Tab => Action::DrumRowNext,
        KeyCode::Char(',') => Action::DrumStepPrev,
        KeyCode::Char('.') => Action::DrumStepNext,
        KeyCode::Enter => Action::DrumToggleCell,
        KeyCode::Char('m') => Action::ToggleRecording,
        KeyCode::Char('p') => Action::Panic,
        _ => return None,
    };
    Some(action)
}

pub const HELP: &str = " a-j notes  z/x octave  \u{2191}\u{2193}\u{2190}\u{2192} params  k/l waves  o osc2  n random  \
space seq  b drums  v write  1-8 step  c/C clear  -/= tempo  _/+ drum tempo  tab , . enter drums  m rec  p panic  esc quit";

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn home_row_is_a_piano() {
        assert_eq!(action_for(press(KeyCode::Char('a'))), Some(Action::Note(NoteId::C)));
        assert_eq!(action_for(press(KeyCode::Char('u'))), Some(Action::Note(NoteId::As)));
    }

    #[test]
    fn digits_select_steps() {
        assert_eq!(action_for(press(KeyCode::Char('1'))), Some(Action::SelectStep(0)));
        assert_eq!(action_for(press(KeyCode::Char('8'))), Some(Action::SelectStep(7)));
        assert_eq!(action_for(press(KeyCode::Char('9'))), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for(key), Some(Action::Quit));
    }
}
