use super::messages::Message;
use super::types::{U4, U7};

const ALL_SOUND_OFF: U7 = 120;
const ALL_NOTES_OFF: U7 = 123;

#[inline]
fn u7(d: &U7) -> u8 {
  d & 0x7f
}

#[inline]
fn status_and_channel(status: U4, channel: &U4) -> u8 {
  (status << 4) | (channel & 0x0f)
}

pub struct Encoder;

impl Encoder {
  pub fn data_size(msg: &Message) -> usize {
    match msg {
      Message::NoteOff { .. } => 3,
      Message::NoteOn { .. } => 3,
      Message::AllSoundOff { .. } => 3,
      Message::AllNotesOff { .. } => 3,
    }
  }

  /// `out` must hold at least `data_size(msg)` bytes.
  pub fn encode(msg: &Message, out: &mut [u8]) {
    match msg {
      Message::NoteOff {
        channel,
        key,
        velocity,
      } => out[..3].copy_from_slice(&[status_and_channel(0b1000, channel), u7(key), u7(velocity)]),
      Message::NoteOn {
        channel,
        key,
        velocity,
      } => out[..3].copy_from_slice(&[status_and_channel(0b1001, channel), u7(key), u7(velocity)]),
      Message::AllSoundOff { channel } => {
        out[..3].copy_from_slice(&[status_and_channel(0b1011, channel), ALL_SOUND_OFF, 0])
      }
      Message::AllNotesOff { channel } => {
        out[..3].copy_from_slice(&[status_and_channel(0b1011, channel), ALL_NOTES_OFF, 0])
      }
    }
  }

  pub fn to_bytes(msg: &Message) -> Vec<u8> {
    let mut out = vec![0u8; Self::data_size(msg)];
    Self::encode(msg, &mut out);
    out
  }
}
