use failure::Fail;
use log::info;

use crate::playback::events::PlaybackEvent;

#[derive(Debug, Fail, PartialEq)]
pub enum SinkError {
  #[fail(display = "The playback sink is closed")]
  Closed,

  #[fail(display = "Failed to send a playback event: {}", cause)]
  Send { cause: String },
}

/// Anything that can consume playback events: a synthesizer, a MIDI port, a printer.
pub trait PlaybackSink {
  fn send(&mut self, event: &PlaybackEvent) -> Result<(), SinkError>;
}

impl<S: PlaybackSink + ?Sized> PlaybackSink for Box<S> {
  fn send(&mut self, event: &PlaybackEvent) -> Result<(), SinkError> {
    (**self).send(event)
  }
}

/// Keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
  events: Vec<PlaybackEvent>,
  closed: bool,
}

impl RecordingSink {
  pub fn new() -> RecordingSink {
    RecordingSink::default()
  }

  pub fn events(&self) -> &[PlaybackEvent] {
    &self.events
  }

  pub fn take(&mut self) -> Vec<PlaybackEvent> {
    std::mem::replace(&mut self.events, Vec::new())
  }

  /// Further events are refused once closed.
  pub fn close(&mut self) {
    self.closed = true;
  }
}

impl PlaybackSink for RecordingSink {
  fn send(&mut self, event: &PlaybackEvent) -> Result<(), SinkError> {
    if self.closed {
      return Err(SinkError::Closed);
    }
    self.events.push(*event);
    Ok(())
  }
}

/// Writes every event to the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl PlaybackSink for LogSink {
  fn send(&mut self, event: &PlaybackEvent) -> Result<(), SinkError> {
    info!("{}", event);
    Ok(())
  }
}
