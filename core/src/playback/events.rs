use std::fmt;

use crate::time::Beat;

/// What a playback sink receives. Pitches use MIDI numbering (60 is C4).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum PlaybackEvent {
  NoteOn {
    instrument: u8,
    pitch: u8,
    velocity: u8,
    beat: Beat,
  },

  NoteOff {
    instrument: u8,
    pitch: u8,
    beat: Beat,
  },

  AllNotesOff,
}

impl PlaybackEvent {
  pub fn beat(&self) -> Option<Beat> {
    match *self {
      PlaybackEvent::NoteOn { beat, .. } | PlaybackEvent::NoteOff { beat, .. } => Some(beat),
      PlaybackEvent::AllNotesOff => None,
    }
  }
}

impl fmt::Display for PlaybackEvent {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      PlaybackEvent::NoteOn {
        instrument,
        pitch,
        velocity,
        beat,
      } => write!(
        f,
        "[{}] on  #{} {} vel {}",
        beat, instrument, pitch, velocity
      ),
      PlaybackEvent::NoteOff {
        instrument,
        pitch,
        beat,
      } => write!(f, "[{}] off #{} {}", beat, instrument, pitch),
      PlaybackEvent::AllNotesOff => f.write_str("all notes off"),
    }
  }
}
