pub const DEFAULT_NUM_BEATS: u8 = 4;
pub const DEFAULT_NOTE_VALUE: u8 = 4;

/// Time signature of a piece. Meter changes are not supported, so a piece
/// carries exactly one of these.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Signature {
  num_beats: u8,  // numerator
  note_value: u8, // denominator
}

impl Signature {
  pub fn new(num_beats: u8, note_value: u8) -> Signature {
    Signature {
      num_beats,
      note_value,
    }
  }

  /// A signature with the given beats per measure over a quarter note.
  pub fn with_beats(num_beats: u8) -> Signature {
    Signature::new(num_beats, DEFAULT_NOTE_VALUE)
  }

  pub fn get_num_beats(&self) -> u8 {
    self.num_beats
  }

  pub fn get_note_value(&self) -> u8 {
    self.note_value
  }
}

impl Default for Signature {
  fn default() -> Self {
    Signature::new(DEFAULT_NUM_BEATS, DEFAULT_NOTE_VALUE)
  }
}
