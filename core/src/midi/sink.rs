use std::collections::HashMap;

use log::trace;

use crate::midi::buffer::{Buffer, Event};
use crate::midi::io::MidiOutput;
use crate::midi::messages::Message;
use crate::midi::types::{U4, U7};
use crate::midi::NUM_CHANNELS;
use crate::playback::{PlaybackEvent, PlaybackSink, SinkError};

/// Turns playback events into MIDI channel messages.
///
/// Instruments are folded onto the 16 MIDI channels. Notes sharing a channel
/// and key are counted, and the note-off goes out when the last of them ends.
/// Silencing everything sends all-notes-off and all-sound-off on every channel.
pub struct MidiSink<O: MidiOutput = Buffer> {
  output: O,
  sounding: HashMap<(U4, U7), usize>,
}

impl MidiSink<Buffer> {
  pub fn buffered() -> MidiSink<Buffer> {
    MidiSink::new(Buffer::new())
  }
}

impl<O: MidiOutput> MidiSink<O> {
  pub fn new(output: O) -> MidiSink<O> {
    MidiSink {
      output,
      sounding: HashMap::new(),
    }
  }

  pub fn output(&self) -> &O {
    &self.output
  }

  pub fn output_mut(&mut self) -> &mut O {
    &mut self.output
  }

  fn channel(instrument: u8) -> U4 {
    instrument % NUM_CHANNELS
  }

  /// Whether the key is still held by another note on the channel.
  fn release(&mut self, channel: U4, key: U7) -> bool {
    let held = match self.sounding.get_mut(&(channel, key)) {
      Some(count) => {
        *count -= 1;
        *count > 0
      }
      None => return false,
    };
    if !held {
      self.sounding.remove(&(channel, key));
    }
    held
  }
}

impl<O: MidiOutput> PlaybackSink for MidiSink<O> {
  fn send(&mut self, event: &PlaybackEvent) -> Result<(), SinkError> {
    match *event {
      PlaybackEvent::NoteOn {
        instrument,
        pitch,
        velocity,
        beat,
      } => {
        let channel = Self::channel(instrument);
        *self.sounding.entry((channel, pitch)).or_insert(0) += 1;
        self.output.push(Event {
          timestamp: Some(beat),
          message: Message::NoteOn {
            channel,
            key: pitch,
            velocity,
          },
        })
      }

      PlaybackEvent::NoteOff {
        instrument,
        pitch,
        beat,
      } => {
        let channel = Self::channel(instrument);
        if self.release(channel, pitch) {
          trace!("Key {} still held on channel {}", pitch, channel);
          return Ok(());
        }
        self.output.push(Event {
          timestamp: Some(beat),
          message: Message::NoteOff {
            channel,
            key: pitch,
            velocity: 0,
          },
        })
      }

      PlaybackEvent::AllNotesOff => {
        self.sounding.clear();
        for channel in 0..NUM_CHANNELS {
          self.output.push(Event {
            timestamp: None,
            message: Message::AllNotesOff { channel },
          })?;
          self.output.push(Event {
            timestamp: None,
            message: Message::AllSoundOff { channel },
          })?;
        }
        Ok(())
      }
    }
  }
}
