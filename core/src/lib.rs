pub mod config;
pub mod console;
pub mod midi;
pub mod note;
pub mod piece;
pub mod pitch;
pub mod playback;
pub mod time;
