use std::time::Duration;

pub const DEFAULT_MICROS_PER_BEAT: u32 = 100_000;

const MICROS_PER_MINUTE: f64 = 60_000_000.0;

/// Tempo in microseconds per beat.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Tempo(u32);

impl Tempo {
  pub fn new(micros_per_beat: u32) -> Tempo {
    Tempo(micros_per_beat)
  }

  pub fn from_bpm(bpm: f64) -> Tempo {
    Tempo((MICROS_PER_MINUTE / bpm).round() as u32)
  }

  pub fn get_value(&self) -> u32 {
    self.0
  }

  pub fn bpm(&self) -> f64 {
    MICROS_PER_MINUTE / f64::from(self.0.max(1))
  }

  /// Wall clock length of one beat.
  pub fn beat_duration(&self) -> Duration {
    Duration::from_micros(u64::from(self.0))
  }
}

impl Default for Tempo {
  fn default() -> Self {
    Tempo(DEFAULT_MICROS_PER_BEAT)
  }
}

impl From<Tempo> for u32 {
  fn from(item: Tempo) -> Self {
    item.0
  }
}

impl From<Tempo> for u64 {
  fn from(item: Tempo) -> Self {
    u64::from(item.0)
  }
}

#[cfg(test)]
mod test {

  use std::time::Duration;

  use super::Tempo;

  #[test]
  pub fn tempo_new() {
    let tempo = Tempo::new(500_000);
    assert_eq!(tempo.get_value(), 500_000);
    assert_eq!(u32::from(tempo), 500_000);
  }

  #[test]
  pub fn tempo_bpm_conversions() {
    let tempo = Tempo::from_bpm(120.0);
    assert_eq!(tempo.get_value(), 500_000);
    assert!((tempo.bpm() - 120.0).abs() < 1e-9);
    assert_eq!(tempo.beat_duration(), Duration::from_millis(500));
  }
}
