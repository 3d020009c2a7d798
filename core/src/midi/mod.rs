pub mod buffer;
pub mod encoder;
pub mod io;
pub mod messages;
pub mod sink;
pub mod types;

pub use self::buffer::Buffer;
pub use self::encoder::Encoder;
pub use self::io::MidiOutput;
pub use self::messages::Message;
pub use self::sink::MidiSink;

pub const NUM_CHANNELS: u8 = 16;
