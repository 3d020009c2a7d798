use crate::midi::messages::Message;
use crate::time::Beat;

/// A message stamped with the beat it belongs to. Control messages sent
/// outside of playback carry no beat.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Event {
  pub timestamp: Option<Beat>,
  pub message: Message,
}

#[derive(Debug, Default)]
pub struct Buffer {
  events: Vec<Event>,
}

impl Buffer {
  pub fn new() -> Buffer {
    Buffer { events: Vec::new() }
  }

  pub fn reset(&mut self) -> &mut Self {
    self.events.clear();
    self
  }

  pub fn push(&mut self, timestamp: Option<Beat>, message: Message) {
    self.events.push(Event { timestamp, message });
  }

  pub fn len(&self) -> usize {
    self.events.len()
  }

  pub fn is_empty(&self) -> bool {
    self.events.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Event> {
    self.events.iter()
  }
}
