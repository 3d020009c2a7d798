use crate::midi::buffer::{Buffer, Event};
use crate::playback::SinkError;

/// Destination of encoded playback: a port, a file writer, a buffer.
pub trait MidiOutput {
  fn push(&mut self, event: Event) -> Result<(), SinkError>;
}

impl MidiOutput for Buffer {
  fn push(&mut self, event: Event) -> Result<(), SinkError> {
    Buffer::push(self, event.timestamp, event.message);
    Ok(())
  }
}
