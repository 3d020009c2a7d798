use std::fmt;
use std::hash::{Hash, Hasher};

use failure::Fail;

use crate::pitch::{self, PitchClass};
use crate::time::Beat;

pub const MAX_VELOCITY: i32 = 127;
pub const MAX_INSTRUMENT: i32 = 127;

/// Distance between the internal numbering (C0 = 0) and MIDI numbering (C4 = 60).
pub const MIDI_PITCH_OFFSET: i32 = 12;

#[derive(Debug, Fail, PartialEq, Clone, Copy)]
pub enum NoteError {
  #[fail(display = "Duration must be at least one beat: {}", duration)]
  InvalidDuration { duration: Beat },

  #[fail(display = "Attack must not be negative: {}", attack)]
  InvalidAttack { attack: Beat },

  #[fail(display = "Velocity must be between 0 and 127: {}", velocity)]
  InvalidVelocity { velocity: i32 },

  #[fail(display = "Instrument must be between 0 and 127: {}", instrument)]
  InvalidInstrument { instrument: i32 },

  #[fail(display = "Octave out of range: {}", octave)]
  InvalidOctave { octave: i32 },
}

/// An immutable note.
///
/// The pitch is kept as a single number of semitones where C0 is 0, so the
/// pitch class and octave are derived from it. Building a note from a flat
/// spelling and reading it back gives the natural or sharp spelling of the
/// same pitch.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Note {
  pitch: i32,
  duration: Beat,
  attack: Beat,
  velocity: u8,
  instrument: u8,
}

impl Note {
  pub fn new(
    pitch_class: PitchClass,
    octave: i32,
    duration: Beat,
    attack: Beat,
    velocity: i32,
    instrument: i32,
  ) -> Result<Note, NoteError> {
    if duration < 1 {
      return Err(NoteError::InvalidDuration { duration });
    }
    if attack < 0 {
      return Err(NoteError::InvalidAttack { attack });
    }
    if attack.checked_add(duration).is_none() {
      return Err(NoteError::InvalidDuration { duration });
    }
    if velocity < 0 || velocity > MAX_VELOCITY {
      return Err(NoteError::InvalidVelocity { velocity });
    }
    if instrument < 0 || instrument > MAX_INSTRUMENT {
      return Err(NoteError::InvalidInstrument { instrument });
    }

    // The MIDI number must fit too, so `midi_key` never overflows.
    let pitch = pitch::midi_number(pitch_class, octave)
      .and_then(|midi| midi.checked_sub(MIDI_PITCH_OFFSET))
      .ok_or(NoteError::InvalidOctave { octave })?;

    Ok(Note {
      pitch,
      duration,
      attack,
      velocity: velocity as u8,
      instrument: instrument as u8,
    })
  }

  /// Semitones above C0.
  pub fn pitch(&self) -> i32 {
    self.pitch
  }

  pub fn pitch_class(&self) -> PitchClass {
    PitchClass::canonicalize(self.pitch)
  }

  pub fn octave(&self) -> i32 {
    self.pitch.div_euclid(12)
  }

  pub fn duration(&self) -> Beat {
    self.duration
  }

  pub fn attack(&self) -> Beat {
    self.attack
  }

  /// First beat after the note stops sounding.
  pub fn end(&self) -> Beat {
    self.attack + self.duration
  }

  pub fn velocity(&self) -> u8 {
    self.velocity
  }

  pub fn instrument(&self) -> u8 {
    self.instrument
  }

  pub fn sounds_at(&self, beat: Beat) -> bool {
    self.attack <= beat && beat < self.end()
  }

  /// B#3 and C4 are the same pitch, and so are Cb4 and B3.
  pub fn same_pitch(&self, other: &Note) -> bool {
    self.pitch == other.pitch
  }

  pub fn is_higher_than(&self, other: &Note) -> bool {
    self.pitch > other.pitch
  }

  /// MIDI key number, if the pitch fits in [0, 127].
  pub fn midi_key(&self) -> Option<u8> {
    let key = self.pitch + MIDI_PITCH_OFFSET;
    if key >= 0 && key <= 127 {
      Some(key as u8)
    } else {
      None
    }
  }
}

// Only the pitch is hashed: equal notes always share a pitch, while notes
// that differ only in timing land in the same bucket.
impl Hash for Note {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.pitch.hash(state);
  }
}

impl fmt::Display for Note {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(&pitch::midi_to_string(self.pitch + MIDI_PITCH_OFFSET))
  }
}
