//! Text rendering of a piece.
//!
//! One column per pitch between the lowest and highest notes, one row per
//! beat. `X` marks a note starting on the beat and `|` a sustained one.

use crate::note::{Note, MIDI_PITCH_OFFSET};
use crate::piece::Piece;
use crate::pitch;

pub fn render(piece: &Piece) -> String {
  let (lowest, range) = match (piece.lowest(), piece.highest()) {
    (Some(low), Some(high)) => (
      low.pitch() + MIDI_PITCH_OFFSET,
      high.pitch() - low.pitch() + 1,
    ),
    _ => (0, 0),
  };

  let width = piece.end().to_string().len();
  let mut out = String::new();

  out.push_str(&" ".repeat(width));
  for midi in lowest..lowest + range {
    out.push_str(&format!("{:>3}", pitch::midi_to_string(midi)));
  }
  out.push('\n');

  for beat in piece.start()..piece.end() {
    out.push_str(&format!("{:>width$}", beat, width = width));

    let sustains = piece.notes_sustained_at(beat);
    let attacks = piece.notes_starting_at(beat);
    for midi in lowest..lowest + range {
      if contains_pitch(&sustains, midi) {
        out.push_str(" | ");
      } else if contains_pitch(&attacks, midi) {
        out.push_str(" X ");
      } else {
        out.push_str("   ");
      }
    }
    out.push('\n');
  }

  out
}

fn contains_pitch(notes: &[Note], midi: i32) -> bool {
  notes
    .iter()
    .any(|note| note.pitch() + MIDI_PITCH_OFFSET == midi)
}
