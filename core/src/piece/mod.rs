pub mod builder;

pub use self::builder::{CompositionBuilder, PieceBuilder};

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use failure::Fail;
use log::{debug, trace};

use crate::note::{Note, NoteError};
use crate::time::{Beat, Signature, Tempo};

pub type PieceLock = Arc<RwLock<Piece>>;

#[derive(Debug, Fail, PartialEq, Clone, Copy)]
pub enum PieceError {
  #[fail(display = "Note {} overlaps with {} at beat {}", note, existing, beat)]
  Overlap {
    note: Note,
    existing: Note,
    beat: Beat,
  },

  #[fail(display = "Note {} was not found", note)]
  NotFound { note: Note },

  #[fail(display = "Invalid note: {}", cause)]
  InvalidNote { cause: NoteError },
}

impl From<NoteError> for PieceError {
  fn from(cause: NoteError) -> Self {
    PieceError::InvalidNote { cause }
  }
}

/// A piece of music indexed by beat.
///
/// Every beat maps to the notes sounding on it, so a note lasting several
/// beats is kept in each of them. No two notes with the same pitch and
/// instrument ever sound on the same beat.
#[derive(Debug, PartialEq, Clone)]
pub struct Piece {
  notes: BTreeMap<Beat, Vec<Note>>,
  signature: Signature,
  tempo: Tempo,
}

impl Default for Piece {
  fn default() -> Self {
    Piece::new(Signature::default(), Tempo::default())
  }
}

impl Piece {
  pub fn new(signature: Signature, tempo: Tempo) -> Piece {
    Piece {
      notes: BTreeMap::new(),
      signature,
      tempo,
    }
  }

  pub fn with_notes<I>(signature: Signature, tempo: Tempo, notes: I) -> Result<Piece, PieceError>
  where
    I: IntoIterator<Item = Note>,
  {
    let mut piece = Piece::new(signature, tempo);
    for note in notes {
      piece.add_note(note)?;
    }
    Ok(piece)
  }

  pub fn builder() -> PieceBuilder {
    PieceBuilder::new()
  }

  pub fn signature(&self) -> Signature {
    self.signature
  }

  pub fn beats_per_measure(&self) -> u8 {
    self.signature.get_num_beats()
  }

  /// Microseconds per beat.
  pub fn tempo(&self) -> Tempo {
    self.tempo
  }

  /// Add a note, failing without changes if a note with the same pitch and
  /// instrument already sounds on any of its beats.
  pub fn add_note(&mut self, note: Note) -> Result<(), PieceError> {
    if let Some((beat, existing)) = self.find_overlap(&note) {
      debug!("Rejecting {} at {}: overlaps {} at beat {}", note, note.attack(), existing, beat);
      return Err(PieceError::Overlap {
        note,
        existing,
        beat,
      });
    }

    for beat in note.attack()..note.end() {
      self.notes.entry(beat).or_insert_with(Vec::new).push(note);
    }

    debug!("Added {} on [{}, {})", note, note.attack(), note.end());
    Ok(())
  }

  /// Remove a note from every beat it sounds on.
  ///
  /// Fails only if the note is missing from all of them. Beats that held it
  /// are cleaned even if some others did not.
  pub fn remove_note(&mut self, note: &Note) -> Result<(), PieceError> {
    let mut found = false;

    for beat in note.attack()..note.end() {
      let emptied = match self.notes.get_mut(&beat) {
        Some(bucket) => match bucket.iter().position(|existing| existing == note) {
          Some(index) => {
            bucket.remove(index);
            found = true;
            bucket.is_empty()
          }
          None => false,
        },
        None => false,
      };

      if emptied {
        self.notes.remove(&beat);
      }
    }

    if found {
      debug!("Removed {} on [{}, {})", note, note.attack(), note.end());
      Ok(())
    } else {
      Err(PieceError::NotFound { note: *note })
    }
  }

  pub fn notes_starting_at(&self, beat: Beat) -> Vec<Note> {
    self.bucket(beat).filter(|note| note.attack() == beat).collect()
  }

  /// Notes starting or sustained at the beat.
  pub fn all_notes_at(&self, beat: Beat) -> Vec<Note> {
    self.bucket(beat).collect()
  }

  pub fn notes_sustained_at(&self, beat: Beat) -> Vec<Note> {
    self.bucket(beat).filter(|note| note.attack() != beat).collect()
  }

  /// Every note once, ordered by attack.
  pub fn notes(&self) -> Vec<Note> {
    self
      .notes
      .iter()
      .flat_map(|(beat, bucket)| bucket.iter().filter(move |note| note.attack() == *beat))
      .cloned()
      .collect()
  }

  pub fn highest(&self) -> Option<Note> {
    self.notes().into_iter().fold(None, |highest, note| match highest {
      Some(highest) if !note.is_higher_than(&highest) => Some(highest),
      _ => Some(note),
    })
  }

  pub fn lowest(&self) -> Option<Note> {
    self.notes().into_iter().fold(None, |lowest, note| match lowest {
      Some(lowest) if note.is_higher_than(&lowest) => Some(lowest),
      _ => Some(note),
    })
  }

  /// First beat with a note, or 0 for an empty piece.
  pub fn start(&self) -> Beat {
    self.notes.keys().next().cloned().unwrap_or(0)
  }

  /// First beat of the silence after the last note, or 0 for an empty piece.
  pub fn end(&self) -> Beat {
    self.notes.keys().next_back().map_or(0, |beat| beat + 1)
  }

  pub fn is_empty(&self) -> bool {
    self.notes.is_empty()
  }

  pub fn reset(&mut self) {
    trace!("Resetting piece with {} beats", self.notes.len());
    self.notes.clear();
  }

  fn bucket<'a>(&'a self, beat: Beat) -> impl Iterator<Item = Note> + 'a {
    self.notes.get(&beat).into_iter().flat_map(|bucket| bucket.iter().cloned())
  }

  fn find_overlap(&self, note: &Note) -> Option<(Beat, Note)> {
    self
      .notes
      .range(note.attack()..note.end())
      .flat_map(|(beat, bucket)| bucket.iter().map(move |existing| (*beat, *existing)))
      .find(|(_, existing)| {
        existing.same_pitch(note) && existing.instrument() == note.instrument()
      })
  }
}

#[cfg(test)]
mod test {

  use std::collections::HashSet;

  use super::{Piece, PieceError};
  use crate::note::Note;
  use crate::pitch::PitchClass;
  use crate::time::{Signature, Tempo};

  fn note(pitch_class: PitchClass, octave: i32, duration: i32, attack: i32) -> Note {
    Note::new(pitch_class, octave, duration, attack, 103, 0).unwrap()
  }

  fn scale() -> Piece {
    Piece::with_notes(
      Signature::default(),
      Tempo::default(),
      vec![
        note(PitchClass::A, 4, 2, 0),
        note(PitchClass::B, 4, 2, 2),
        note(PitchClass::C, 5, 2, 4),
      ],
    )
    .unwrap()
  }

  #[test]
  pub fn piece_new_is_empty() {
    let piece = Piece::new(Signature::new(3, 4), Tempo::new(250_000));
    assert!(piece.is_empty());
    assert_eq!(piece.beats_per_measure(), 3);
    assert_eq!(piece.tempo(), Tempo::new(250_000));
    assert_eq!(piece.start(), 0);
    assert_eq!(piece.end(), 0);
    assert_eq!(piece.highest(), None);
    assert_eq!(piece.lowest(), None);
    assert!(piece.notes().is_empty());
  }

  #[test]
  /// A note is indexed on every beat it sounds
  pub fn piece_add_note() {
    let mut piece = Piece::default();
    let a4 = note(PitchClass::A, 4, 3, 1);
    piece.add_note(a4).unwrap();

    assert!(piece.all_notes_at(0).is_empty());
    assert_eq!(piece.all_notes_at(1), vec![a4]);
    assert_eq!(piece.all_notes_at(2), vec![a4]);
    assert_eq!(piece.all_notes_at(3), vec![a4]);
    assert!(piece.all_notes_at(4).is_empty());
    assert_eq!(piece.notes(), vec![a4]);
  }

  #[test]
  /// A rejected overlap leaves the piece untouched
  pub fn piece_add_note_overlap() {
    let mut piece = Piece::default();
    let first = note(PitchClass::A, 4, 2, 0);
    piece.add_note(first).unwrap();
    let before = piece.clone();

    let second = note(PitchClass::A, 4, 2, 1);
    assert_eq!(
      piece.add_note(second),
      Err(PieceError::Overlap {
        note: second,
        existing: first,
        beat: 1,
      })
    );
    assert_eq!(piece, before);
    assert!(piece.all_notes_at(2).is_empty());
    assert!(piece.notes_starting_at(1).is_empty());
  }

  #[test]
  pub fn piece_add_note_overlap_is_enharmonic() {
    let mut piece = Piece::default();
    piece.add_note(note(PitchClass::C, 4, 4, 0)).unwrap();
    assert!(piece.add_note(note(PitchClass::Bs, 3, 1, 3)).is_err());
    assert!(piece.add_note(note(PitchClass::Cb, 4, 1, 3)).is_ok());
  }

  #[test]
  /// Same pitch is allowed on another instrument or right after the note ends
  pub fn piece_add_note_without_overlap() {
    let mut piece = Piece::default();
    piece.add_note(note(PitchClass::A, 4, 2, 0)).unwrap();
    piece.add_note(Note::new(PitchClass::A, 4, 2, 0, 103, 1).unwrap()).unwrap();
    piece.add_note(note(PitchClass::A, 4, 2, 2)).unwrap();
    piece.add_note(note(PitchClass::As, 4, 4, 0)).unwrap();
    assert_eq!(piece.notes().len(), 4);
    assert_eq!(piece.all_notes_at(1).len(), 3);
  }

  #[test]
  pub fn piece_overlap_invariant_holds() {
    let mut piece = Piece::default();
    for attack in 0..6 {
      for duration in 1..4 {
        let _ = piece.add_note(note(PitchClass::E, 4, duration, attack));
        let _ = piece.add_note(Note::new(PitchClass::Fb, 4, duration, attack, 20, 2).unwrap());
      }
    }

    let notes = piece.notes();
    for a in notes.iter() {
      for b in notes.iter() {
        if a != b && a.instrument() == b.instrument() && a.same_pitch(b) {
          assert!(a.end() <= b.attack() || b.end() <= a.attack(), "{:?} {:?}", a, b);
        }
      }
    }
  }

  #[test]
  pub fn piece_remove_note() {
    let mut piece = scale();
    let b4 = note(PitchClass::B, 4, 2, 2);
    piece.remove_note(&b4).unwrap();

    assert!(piece.all_notes_at(2).is_empty());
    assert!(piece.all_notes_at(3).is_empty());
    assert!(!piece.notes.contains_key(&2));
    assert!(!piece.notes.contains_key(&3));
    assert_eq!(piece.notes().len(), 2);
    assert_eq!(piece.end(), 6);
  }

  #[test]
  /// Removing a note that was never added fails and changes nothing
  pub fn piece_remove_note_not_found() {
    let mut piece = scale();
    let before = piece.clone();
    let missing = note(PitchClass::A, 4, 3, 0);

    assert_eq!(
      piece.remove_note(&missing),
      Err(PieceError::NotFound { note: missing })
    );
    assert_eq!(piece, before);
  }

  #[test]
  /// A note present on only some of its beats is removed from those
  pub fn piece_remove_note_partially_present() {
    let mut piece = Piece::default();
    let long = note(PitchClass::G, 3, 3, 0);
    let other = note(PitchClass::D, 3, 1, 1);
    piece.add_note(long).unwrap();
    piece.add_note(other).unwrap();
    piece.notes.get_mut(&1).unwrap().retain(|n| *n != long);

    piece.remove_note(&long).unwrap();
    assert!(piece.all_notes_at(0).is_empty());
    assert_eq!(piece.all_notes_at(1), vec![other]);
    assert!(piece.all_notes_at(2).is_empty());
    assert_eq!(piece.start(), 1);
    assert_eq!(piece.end(), 2);
  }

  #[test]
  pub fn piece_remove_note_keeps_other_instruments() {
    let mut piece = Piece::default();
    let first = note(PitchClass::F, 4, 2, 0);
    let second = Note::new(PitchClass::F, 4, 2, 0, 103, 9).unwrap();
    piece.add_note(first).unwrap();
    piece.add_note(second).unwrap();
    piece.remove_note(&second).unwrap();
    assert_eq!(piece.notes(), vec![first]);
    assert_eq!(piece.remove_note(&second), Err(PieceError::NotFound { note: second }));
  }

  #[test]
  pub fn piece_queries_split_starting_and_sustained() {
    let mut piece = scale();
    let e4 = note(PitchClass::E, 4, 4, 1);
    piece.add_note(e4).unwrap();

    assert_eq!(piece.notes_starting_at(2), vec![note(PitchClass::B, 4, 2, 2)]);
    assert_eq!(piece.notes_sustained_at(2), vec![e4]);
    assert_eq!(piece.notes_starting_at(1), vec![e4]);
    assert_eq!(piece.notes_sustained_at(1), vec![note(PitchClass::A, 4, 2, 0)]);
    assert!(piece.notes_starting_at(42).is_empty());
    assert!(piece.notes_sustained_at(42).is_empty());

    for beat in -1..8 {
      let all: HashSet<_> = piece
        .all_notes_at(beat)
        .into_iter()
        .map(|n| (n, n.attack()))
        .collect();
      let starting: HashSet<_> = piece
        .notes_starting_at(beat)
        .into_iter()
        .map(|n| (n, n.attack()))
        .collect();
      let sustained: HashSet<_> = piece
        .notes_sustained_at(beat)
        .into_iter()
        .map(|n| (n, n.attack()))
        .collect();
      assert!(starting.is_disjoint(&sustained));
      assert_eq!(all, starting.union(&sustained).cloned().collect());
      assert_eq!(piece.all_notes_at(beat).len(), starting.len() + sustained.len());
    }
  }

  #[test]
  pub fn piece_start_and_end() {
    let mut piece = Piece::default();
    assert_eq!((piece.start(), piece.end()), (0, 0));

    piece.add_note(note(PitchClass::C, 4, 3, 5)).unwrap();
    assert_eq!(piece.start(), 5);
    assert_eq!(piece.end(), 8);
  }

  #[test]
  pub fn piece_highest_and_lowest() {
    let mut piece = scale();
    piece.add_note(note(PitchClass::Bs, 5, 8, 0)).unwrap();
    piece.add_note(note(PitchClass::Cb, 4, 1, 7)).unwrap();

    assert_eq!(piece.highest(), Some(note(PitchClass::C, 6, 8, 0)));
    assert_eq!(piece.lowest(), Some(note(PitchClass::B, 3, 1, 7)));
  }

  #[test]
  /// Long notes are counted once by the extremal queries
  pub fn piece_notes_are_counted_once() {
    let mut piece = Piece::default();
    piece.add_note(note(PitchClass::G, 2, 10, 0)).unwrap();
    assert_eq!(piece.notes().len(), 1);
    assert_eq!(piece.highest(), piece.lowest());
  }

  #[test]
  pub fn piece_reset() {
    let mut piece = scale();
    piece.reset();
    assert!(piece.is_empty());
    assert_eq!(piece.end(), 0);
    assert_eq!(piece.beats_per_measure(), 4);
  }

  #[test]
  pub fn piece_with_notes_rejects_overlaps() {
    let result = Piece::with_notes(
      Signature::default(),
      Tempo::default(),
      vec![note(PitchClass::D, 4, 2, 0), note(PitchClass::D, 4, 1, 1)],
    );
    match result {
      Err(PieceError::Overlap { beat, .. }) => assert_eq!(beat, 1),
      other => panic!("Unexpected {:?}", other),
    }
  }
}
