use std::fmt;

/// Spellings of the twelve semitone classes, including enharmonics.
///
/// `Es`/`Fb` and `Bs`/`Cb` are valid input spellings. `Bs` and `Cb` are the only
/// spellings that cross an octave boundary: B#3 sounds as C4 and Cb4 sounds as B3.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum PitchClass {
  C,
  Cs,
  Db,
  D,
  Ds,
  Eb,
  E,
  Es,
  Fb,
  F,
  Fs,
  Gb,
  G,
  Gs,
  Ab,
  A,
  As,
  Bb,
  B,
  Bs,
  Cb,
}

impl PitchClass {
  pub const ALL: [PitchClass; 21] = [
    PitchClass::C,
    PitchClass::Cs,
    PitchClass::Db,
    PitchClass::D,
    PitchClass::Ds,
    PitchClass::Eb,
    PitchClass::E,
    PitchClass::Es,
    PitchClass::Fb,
    PitchClass::F,
    PitchClass::Fs,
    PitchClass::Gb,
    PitchClass::G,
    PitchClass::Gs,
    PitchClass::Ab,
    PitchClass::A,
    PitchClass::As,
    PitchClass::Bb,
    PitchClass::B,
    PitchClass::Bs,
    PitchClass::Cb,
  ];

  /// Semitones above C, in [0, 11]. Enharmonic spellings share the value.
  pub fn semitone(self) -> u8 {
    match self {
      PitchClass::C | PitchClass::Bs => 0,
      PitchClass::Cs | PitchClass::Db => 1,
      PitchClass::D => 2,
      PitchClass::Ds | PitchClass::Eb => 3,
      PitchClass::E | PitchClass::Fb => 4,
      PitchClass::F | PitchClass::Es => 5,
      PitchClass::Fs | PitchClass::Gb => 6,
      PitchClass::G => 7,
      PitchClass::Gs | PitchClass::Ab => 8,
      PitchClass::A => 9,
      PitchClass::As | PitchClass::Bb => 10,
      PitchClass::B | PitchClass::Cb => 11,
    }
  }

  /// Octaves to add to the written octave to get the sounding one.
  pub fn octave_offset(self) -> i32 {
    match self {
      PitchClass::Bs => 1,
      PitchClass::Cb => -1,
      _ => 0,
    }
  }

  pub fn is_flat(self) -> bool {
    match self {
      PitchClass::Db
      | PitchClass::Eb
      | PitchClass::Fb
      | PitchClass::Gb
      | PitchClass::Ab
      | PitchClass::Bb
      | PitchClass::Cb => true,
      _ => false,
    }
  }

  /// Map any integer onto a spelling, preferring naturals and then sharps.
  pub fn canonicalize(value: i32) -> PitchClass {
    match value.rem_euclid(12) {
      0 => PitchClass::C,
      1 => PitchClass::Cs,
      2 => PitchClass::D,
      3 => PitchClass::Ds,
      4 => PitchClass::E,
      5 => PitchClass::F,
      6 => PitchClass::Fs,
      7 => PitchClass::G,
      8 => PitchClass::Gs,
      9 => PitchClass::A,
      10 => PitchClass::As,
      _ => PitchClass::B,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      PitchClass::C => "C",
      PitchClass::Cs => "C#",
      PitchClass::Db => "D\u{266D}",
      PitchClass::D => "D",
      PitchClass::Ds => "D#",
      PitchClass::Eb => "E\u{266D}",
      PitchClass::E => "E",
      PitchClass::Es => "E#",
      PitchClass::Fb => "F\u{266D}",
      PitchClass::F => "F",
      PitchClass::Fs => "F#",
      PitchClass::Gb => "G\u{266D}",
      PitchClass::G => "G",
      PitchClass::Gs => "G#",
      PitchClass::Ab => "A\u{266D}",
      PitchClass::A => "A",
      PitchClass::As => "A#",
      PitchClass::Bb => "B\u{266D}",
      PitchClass::B => "B",
      PitchClass::Bs => "B#",
      PitchClass::Cb => "C\u{266D}",
    }
  }
}

impl fmt::Display for PitchClass {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(self.name())
  }
}

// MIDI numbering: C4 = 60, so octave -1 starts at 0.

/// `None` when the number does not fit in an `i32`.
pub fn midi_number(pitch_class: PitchClass, octave: i32) -> Option<i32> {
  octave
    .checked_add(pitch_class.octave_offset() + 1)
    .and_then(|octave| octave.checked_mul(12))
    .and_then(|base| base.checked_add(i32::from(pitch_class.semitone())))
}

pub fn midi_to_pitch_class(midi: i32) -> PitchClass {
  PitchClass::canonicalize(midi)
}

pub fn midi_to_octave(midi: i32) -> i32 {
  midi.div_euclid(12) - 1
}

/// Name of a MIDI number, e.g. `60` is `"C4"`.
pub fn midi_to_string(midi: i32) -> String {
  format!("{}{}", midi_to_pitch_class(midi), midi_to_octave(midi))
}

#[cfg(test)]
mod test {

  use super::{midi_number, midi_to_octave, midi_to_pitch_class, midi_to_string, PitchClass};

  #[test]
  pub fn semitones_in_range() {
    for pitch_class in PitchClass::ALL.iter() {
      assert!(pitch_class.semitone() <= 11, "{:?}", pitch_class);
    }
  }

  #[test]
  /// Enharmonic spellings share the semitone value
  pub fn enharmonics_share_semitone() {
    assert_eq!(PitchClass::Cs.semitone(), PitchClass::Db.semitone());
    assert_eq!(PitchClass::Gs.semitone(), PitchClass::Ab.semitone());
    assert_eq!(PitchClass::Es.semitone(), PitchClass::F.semitone());
    assert_eq!(PitchClass::Fb.semitone(), PitchClass::E.semitone());
    assert_eq!(PitchClass::Bs.semitone(), PitchClass::C.semitone());
    assert_eq!(PitchClass::Cb.semitone(), PitchClass::B.semitone());
  }

  #[test]
  /// Canonicalization never produces a flat
  pub fn canonicalize_is_flat_free() {
    for value in -24..48 {
      let pitch_class = PitchClass::canonicalize(value);
      assert!(!pitch_class.is_flat(), "{} -> {:?}", value, pitch_class);
      assert_eq!(i32::from(pitch_class.semitone()), value.rem_euclid(12));
      assert_eq!(pitch_class.octave_offset(), 0);
    }
  }

  #[test]
  pub fn canonicalize_prefers_naturals_then_sharps() {
    assert_eq!(PitchClass::canonicalize(0), PitchClass::C);
    assert_eq!(PitchClass::canonicalize(5), PitchClass::F);
    assert_eq!(PitchClass::canonicalize(10), PitchClass::As);
    assert_eq!(PitchClass::canonicalize(23), PitchClass::B);
    assert_eq!(PitchClass::canonicalize(-1), PitchClass::B);
  }

  #[test]
  pub fn midi_conversions() {
    assert_eq!(midi_number(PitchClass::C, 4), Some(60));
    assert_eq!(midi_number(PitchClass::A, 4), Some(69));
    assert_eq!(midi_number(PitchClass::Bs, 3), Some(60));
    assert_eq!(midi_number(PitchClass::Cb, 4), Some(59));
    assert_eq!(midi_number(PitchClass::C, 200_000_000), None);
    assert_eq!(midi_number(PitchClass::Bs, i32::max_value() - 1), None);
    assert_eq!(midi_to_pitch_class(61), PitchClass::Cs);
    assert_eq!(midi_to_octave(60), 4);
    assert_eq!(midi_to_octave(0), -1);
    assert_eq!(midi_to_string(60), "C4");
    assert_eq!(midi_to_string(70), "A#4");
  }

  #[test]
  pub fn display_uses_flat_sign() {
    assert_eq!(PitchClass::Bb.to_string(), "B\u{266D}");
    assert_eq!(PitchClass::Fs.to_string(), "F#");
  }
}
