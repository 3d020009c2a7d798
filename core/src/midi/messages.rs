use crate::midi::types::{U4, U7};

/// Channel messages needed for playback.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Message {
  NoteOff {
    channel: U4,
    key: U7,
    velocity: U7,
  },

  NoteOn {
    channel: U4,
    key: U7,
    velocity: U7,
  },

  AllSoundOff {
    channel: U4,
  },

  AllNotesOff {
    channel: U4,
  },
}
