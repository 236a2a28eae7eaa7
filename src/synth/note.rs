use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::VoiceError;

/*
Pitch Classes
=============

Notes are addressed by pitch class (one of the 12 semitone names) plus an
octave. Each pitch class stores its frequency at the reference octave 4,
equal-tempered around A4 = 440 Hz:

    C4  261.63    F#4 369.99
    C#4 277.18    G4  392.00
    D4  293.66    G#4 415.30
    D#4 311.13    A4  440.00
    E4  329.63    A#4 466.16
    F4  349.23    B4  493.88

Frequency at any other octave doubles (or halves) per octave:

    freq(note, octave) = base(note) * 2^(octave - 4)

  C3 = 130.81 Hz, C4 = 261.63 Hz, C5 = 523.25 Hz

Flats parse as the enharmonic sharp: "Db" is C#, "Bb" is A#.
*/

/// Reference octave for [`NoteId::base_frequency`].
pub const REFERENCE_OCTAVE: i32 = 4;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NoteId {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl NoteId {
    pub const ALL: [NoteId; 12] = [
        NoteId::C,
        NoteId::Cs,
        NoteId::D,
        NoteId::Ds,
        NoteId::E,
        NoteId::F,
        NoteId::Fs,
        NoteId::G,
        NoteId::Gs,
        NoteId::A,
        NoteId::As,
        NoteId::B,
    ];

    /// Semitones above C.
    pub fn semitone(self) -> u8 {
        self as u8
    }

    pub fn from_semitone(semitone: u8) -> Option<Self> {
        Self::ALL.get(semitone as usize).copied()
    }

    /// Frequency in Hz at the reference octave.
    pub fn base_frequency(self) -> f32 {
        match self {
            NoteId::C => 261.63,
            NoteId::Cs => 277.18,
            NoteId::D => 293.66,
            NoteId::Ds => 311.13,
            NoteId::E => 329.63,
            NoteId::F => 349.23,
            NoteId::Fs => 369.99,
            NoteId::G => 392.00,
            NoteId::Gs => 415.30,
            NoteId::A => 440.00,
            NoteId::As => 466.16,
            NoteId::B => 493.88,
        }
    }

    /// Frequency in Hz at `octave`.
    pub fn frequency(self, octave: i32) -> f32 {
        self.base_frequency() * 2.0_f32.powi(octave - REFERENCE_OCTAVE)
    }

    pub fn name(self) -> &'static str {
        match self {
            NoteId::C => "C",
            NoteId::Cs => "C#",
            NoteId::D => "D",
            NoteId::Ds => "D#",
            NoteId::E => "E",
            NoteId::F => "F",
            NoteId::Fs => "F#",
            NoteId::G => "G",
            NoteId::Gs => "G#",
            NoteId::A => "A",
            NoteId::As => "A#",
            NoteId::B => "B",
        }
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoteId {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || VoiceError::UnknownNote(s.to_string());
        let mut chars = s.trim().chars();

        let letter = chars.next().ok_or_else(unknown)?.to_ascii_uppercase();
        let natural: i8 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(unknown()),
        };

        let accidental: i8 = match chars.as_str() {
            "" => 0,
            "#" | "s" | "S" => 1,
            "b" => -1,
            _ => return Err(unknown()),
        };

        let semitone = (natural + accidental).rem_euclid(12) as u8;
        Self::from_semitone(semitone).ok_or_else(unknown)
    }
}
