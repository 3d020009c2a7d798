pub mod events;
pub mod player;
pub mod scheduler;
pub mod sink;

pub use self::events::PlaybackEvent;
pub use self::player::{Player, PlayerError, PlayerState};
pub use self::scheduler::{tick, Tick};
pub use self::sink::{LogSink, PlaybackSink, RecordingSink, SinkError};
