//! Per beat note-on/note-off diff.
//!
//! `tick` has no state of its own: it compares the notes sounding on the
//! previous beat with the ones starting on the current beat. The caller must
//! tick every beat from the start of the piece to its end, both included,
//! in order. A skipped beat loses its events.

use log::{trace, warn};

use crate::note::Note;
use crate::piece::Piece;
use crate::playback::events::PlaybackEvent;
use crate::time::Beat;

/// Events for a single beat. Offs must reach the sink before ons, so a note
/// ending and an equal note starting on the same beat do not collide.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Tick {
  pub offs: Vec<PlaybackEvent>,
  pub ons: Vec<PlaybackEvent>,
}

impl Tick {
  pub fn is_empty(&self) -> bool {
    self.offs.is_empty() && self.ons.is_empty()
  }

  /// Offs followed by ons.
  pub fn events<'a>(&'a self) -> impl Iterator<Item = &'a PlaybackEvent> + 'a {
    self.offs.iter().chain(self.ons.iter())
  }

  pub fn into_events(self) -> Vec<PlaybackEvent> {
    let mut events = self.offs;
    events.extend(self.ons);
    events
  }
}

pub fn tick(piece: &Piece, beat: Beat) -> Tick {
  let previous = beat
    .checked_sub(1)
    .map(|previous| piece.all_notes_at(previous))
    .unwrap_or_default();

  let offs = previous
    .into_iter()
    .filter(|note| note.end() == beat)
    .filter_map(|note| {
      midi_key(&note).map(|pitch| PlaybackEvent::NoteOff {
        instrument: note.instrument(),
        pitch,
        beat,
      })
    })
    .collect();

  let ons = piece
    .notes_starting_at(beat)
    .into_iter()
    .filter_map(|note| {
      midi_key(&note).map(|pitch| PlaybackEvent::NoteOn {
        instrument: note.instrument(),
        pitch,
        velocity: note.velocity(),
        beat,
      })
    })
    .collect();

  let tick = Tick { offs, ons };
  trace!(
    "Tick {}: {} off, {} on",
    beat,
    tick.offs.len(),
    tick.ons.len()
  );
  tick
}

/// Silences everything regardless of what the piece says is sounding.
pub fn all_notes_off() -> PlaybackEvent {
  PlaybackEvent::AllNotesOff
}

fn midi_key(note: &Note) -> Option<u8> {
  let key = note.midi_key();
  if key.is_none() {
    warn!("Skipping {:?}: pitch out of the MIDI range", note);
  }
  key
}
