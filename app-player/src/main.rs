use std::path::Path;
use std::sync::{Arc, RwLock};

use log::{debug, info, LevelFilter};

use failure::{Error, Fail};

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};

use cadence_core::config::{Config, SinkKind};
use cadence_core::console;
use cadence_core::midi::MidiSink;
use cadence_core::piece::{CompositionBuilder, Piece};
use cadence_core::playback::{LogSink, PlaybackSink, Player};

mod output;
use crate::output::LogOutput;

mod player_thread;
use crate::player_thread::{Notification, PlayerThread, Protocol};

const CADENCE_CONFIG: &str = "CADENCE_CONFIG";
const DEFAULT_CADENCE_CONFIG: &str = "cadence.toml";

const CADENCE_LOG_CONFIG: &str = "CADENCE_LOG_CONFIG";
const DEFAULT_CADENCE_LOG_CONFIG: &str = "log4rs.yaml";

/// Times a looping piece is repeated before the player is stopped.
const MAX_LOOPS: usize = 2;

#[derive(Debug, Fail)]
enum MainError {
  #[fail(display = "Failed to init logging: {}", cause)]
  LoggingInit { cause: String },

  #[fail(display = "The player thread finished unexpectedly")]
  PlayerGone,
}

fn main() -> Result<(), Error> {
  init_logging()?;

  let config = init_config()?;

  let piece = init_piece(&config)?;

  info!("Playing:\n{}", console::render(&piece));

  let piece_lock = Arc::new(RwLock::new(piece));

  let mut player = Player::new(piece_lock, init_sink(config.playback.sink));
  player.set_loop_enabled(config.playback.loop_enabled);

  let (notification_tx, notification_rx) = crossbeam_channel::unbounded::<Notification>();

  let player_thread = PlayerThread::start(player, notification_tx)?;

  player_thread.send(Protocol::Play)?;

  let mut loops = 0;
  loop {
    match notification_rx.recv().map_err(|_| MainError::PlayerGone)? {
      Notification::Finished => break,
      Notification::Looped => {
        loops += 1;
        debug!("Loop {} of {}", loops, MAX_LOOPS);
        if loops >= MAX_LOOPS {
          player_thread.send(Protocol::Stop)?;
          break;
        }
      }
    }
  }

  player_thread.stop()?;

  Ok(())
}

fn init_logging() -> Result<(), Error> {
  let log_config_path =
    std::env::var(CADENCE_LOG_CONFIG).unwrap_or_else(|_| DEFAULT_CADENCE_LOG_CONFIG.to_string());

  if Path::new(&log_config_path).exists() {
    log4rs::init_file(log_config_path.as_str(), Default::default()).map_err(|err| {
      MainError::LoggingInit {
        cause: err.to_string(),
      }
    })?;
  } else {
    let stdout = ConsoleAppender::builder().build();
    let log_config = LogConfig::builder()
      .appender(Appender::builder().build("stdout", Box::new(stdout)))
      .build(Root::builder().appender("stdout").build(LevelFilter::Info))
      .map_err(|err| MainError::LoggingInit {
        cause: format!("{:?}", err),
      })?;
    log4rs::init_config(log_config).map_err(|err| MainError::LoggingInit {
      cause: err.to_string(),
    })?;
    debug!("{} not found, logging to the console", log_config_path);
  }

  Ok(())
}

fn init_config() -> Result<Config, Error> {
  let config_path =
    std::env::var(CADENCE_CONFIG).unwrap_or_else(|_| DEFAULT_CADENCE_CONFIG.to_string());

  let config = if Path::new(&config_path).exists() {
    info!("Loading configuration from {} ...", config_path);
    Config::from_file(config_path.as_str())?
  } else {
    info!("No configuration at {}, using defaults", config_path);
    Config::default()
  };
  debug!("{:#?}", config);

  Ok(config)
}

/// A short two voice phrase: a melody over a bass line.
fn init_piece(config: &Config) -> Result<Piece, Error> {
  info!("Building the piece ...");

  let tempo = config.piece.tempo();
  info!("Tempo: {:.1} bpm", tempo.bpm());

  let mut builder = Piece::builder();
  builder
    .set_beats_per_measure(config.piece.beats_per_measure)
    .set_tempo(tempo.get_value());

  let melody = [(0, 2, 69), (2, 4, 71), (4, 6, 72), (6, 7, 74), (7, 8, 76)];
  for &(start, end, pitch) in melody.iter() {
    builder.add_note(start, end, 1, pitch, 100)?;
  }

  let bass = [(0, 4, 45), (4, 8, 43)];
  for &(start, end, pitch) in bass.iter() {
    builder.add_note(start, end, 2, pitch, 80)?;
  }

  let piece = builder.build()?;
  debug!(
    "{} notes from beat {} to {}",
    piece.notes().len(),
    piece.start(),
    piece.end()
  );

  Ok(piece)
}

fn init_sink(kind: SinkKind) -> Box<dyn PlaybackSink + Send> {
  match kind {
    SinkKind::Log => Box::new(LogSink),
    SinkKind::Midi => Box::new(MidiSink::new(LogOutput::new())),
  }
}
