use log::trace;

use crate::note::Note;
use crate::piece::{Piece, PieceError};
use crate::pitch;
use crate::time::{Beat, Signature, Tempo};

/// Receives notes from a composition reader, in MIDI terms.
pub trait CompositionBuilder {
  type Output;

  /// Tempo in microseconds per beat.
  fn set_tempo(&mut self, micros_per_beat: u32) -> &mut Self;

  /// `end` is exclusive, `instrument` is 1-based and `pitch` uses MIDI
  /// numbering (60 is C4).
  fn add_note(
    &mut self,
    start: Beat,
    end: Beat,
    instrument: i32,
    pitch: i32,
    velocity: i32,
  ) -> Result<&mut Self, PieceError>;

  fn build(self) -> Result<Self::Output, PieceError>;
}

/// Collects notes and builds a [`Piece`] from them.
///
/// Defaults to 4 beats per measure and 100000 microseconds per beat.
#[derive(Debug, Clone, Default)]
pub struct PieceBuilder {
  signature: Signature,
  tempo: Tempo,
  notes: Vec<Note>,
}

impl PieceBuilder {
  pub fn new() -> PieceBuilder {
    PieceBuilder::default()
  }

  pub fn set_beats_per_measure(&mut self, beats_per_measure: u8) -> &mut Self {
    self.signature = Signature::with_beats(beats_per_measure);
    self
  }
}

impl CompositionBuilder for PieceBuilder {
  type Output = Piece;

  fn set_tempo(&mut self, micros_per_beat: u32) -> &mut Self {
    self.tempo = Tempo::new(micros_per_beat);
    self
  }

  fn add_note(
    &mut self,
    start: Beat,
    end: Beat,
    instrument: i32,
    pitch: i32,
    velocity: i32,
  ) -> Result<&mut Self, PieceError> {
    let note = Note::new(
      pitch::midi_to_pitch_class(pitch),
      pitch::midi_to_octave(pitch),
      end - start,
      start,
      velocity,
      instrument - 1,
    )?;
    trace!("Builder note {} on [{}, {})", note, start, end);
    self.notes.push(note);
    Ok(self)
  }

  fn build(self) -> Result<Piece, PieceError> {
    Piece::with_notes(self.signature, self.tempo, self.notes)
  }
}
