use std::fmt;

use crate::time::{Beat, Signature};

/// A beat expressed as measure and beat within the measure, both zero based.
#[derive(PartialEq, Clone, Copy)]
pub struct BarsTime {
  bars: u32,
  beats: u16,
}

impl BarsTime {
  pub fn from_beats(beat: Beat, signature: Signature) -> BarsTime {
    let num_beats = i64::from(signature.get_num_beats().max(1));
    let beat = i64::from(beat.max(0));
    BarsTime {
      bars: (beat / num_beats) as u32,
      beats: (beat % num_beats) as u16,
    }
  }

  pub fn get_bars(&self) -> u32 {
    self.bars
  }

  pub fn get_beats(&self) -> u16 {
    self.beats
  }
}

impl fmt::Debug for BarsTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:05}:{:02}", self.bars + 1, self.beats + 1)
  }
}
