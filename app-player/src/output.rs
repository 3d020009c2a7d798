use log::info;

use cadence_core::midi::buffer::Event;
use cadence_core::midi::{Encoder, MidiOutput};
use cadence_core::playback::SinkError;

/// Prints the raw bytes of every MIDI message instead of sending them to a port.
#[derive(Debug, Default)]
pub struct LogOutput {
  sent: usize,
}

impl LogOutput {
  pub fn new() -> LogOutput {
    LogOutput::default()
  }

  pub fn sent(&self) -> usize {
    self.sent
  }
}

impl MidiOutput for LogOutput {
  fn push(&mut self, event: Event) -> Result<(), SinkError> {
    let bytes = Encoder::to_bytes(&event.message);
    let hex: Vec<String> = bytes.iter().map(|byte| format!("{:02X}", byte)).collect();
    match event.timestamp {
      Some(beat) => info!("{:>5} | {}", beat, hex.join(" ")),
      None => info!("      | {}", hex.join(" ")),
    }
    self.sent += 1;
    Ok(())
  }
}
