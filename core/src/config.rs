use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

use crate::time::{Signature, Tempo};

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
  #[serde(rename = "log")]
  Log,
  #[serde(rename = "midi")]
  Midi,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PieceConfig {
  pub beats_per_measure: u8,
  /// Microseconds per beat.
  pub tempo: u32,
  /// Beats per minute, takes precedence over `tempo` when positive.
  pub bpm: Option<f64>,
}

impl Default for PieceConfig {
  fn default() -> PieceConfig {
    PieceConfig {
      beats_per_measure: crate::time::signature::DEFAULT_NUM_BEATS,
      tempo: crate::time::tempo::DEFAULT_MICROS_PER_BEAT,
      bpm: None,
    }
  }
}

impl PieceConfig {
  pub fn signature(&self) -> Signature {
    Signature::with_beats(self.beats_per_measure)
  }

  pub fn tempo(&self) -> Tempo {
    self
      .bpm
      .filter(|bpm| *bpm > 0.0)
      .map(Tempo::from_bpm)
      .unwrap_or_else(|| Tempo::new(self.tempo))
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
  #[serde(rename = "loop")]
  pub loop_enabled: bool,
  pub sink: SinkKind,
}

impl Default for PlaybackConfig {
  fn default() -> PlaybackConfig {
    PlaybackConfig {
      loop_enabled: false,
      sink: SinkKind::Log,
    }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
  pub piece: PieceConfig,
  pub playback: PlaybackConfig,
}

impl Config {
  pub fn from_file<'a, T>(path: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
  }

  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}
