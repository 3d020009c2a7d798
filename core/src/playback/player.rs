use failure::Fail;
use log::{debug, info};

use crate::piece::PieceLock;
use crate::playback::scheduler;
use crate::playback::sink::{PlaybackSink, SinkError};
use crate::time::{BarsTime, Beat};

#[derive(Debug, Fail)]
pub enum PlayerError {
  #[fail(display = "Unable to lock the piece for read")]
  PieceLock,

  #[fail(display = "Playback sink failed: {}", cause)]
  Sink { cause: SinkError },
}

impl From<SinkError> for PlayerError {
  fn from(cause: SinkError) -> Self {
    PlayerError::Sink { cause }
  }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlayerState {
  Stopped,
  Playing,
  Paused,
}

/// Walks a piece beat by beat and feeds the scheduled events to a sink.
///
/// The player does not keep time. Whoever drives it calls [`Player::step`]
/// once per beat, typically every `tempo.beat_duration()`.
pub struct Player<S: PlaybackSink> {
  piece: PieceLock,
  sink: S,
  state: PlayerState,
  position: Beat,
  loop_enabled: bool,
}

impl<S: PlaybackSink> Player<S> {
  pub fn new(piece: PieceLock, sink: S) -> Player<S> {
    Player {
      piece,
      sink,
      state: PlayerState::Stopped,
      position: 0,
      loop_enabled: false,
    }
  }

  pub fn piece(&self) -> &PieceLock {
    &self.piece
  }

  pub fn sink(&self) -> &S {
    &self.sink
  }

  pub fn sink_mut(&mut self) -> &mut S {
    &mut self.sink
  }

  pub fn into_sink(self) -> S {
    self.sink
  }

  pub fn state(&self) -> PlayerState {
    self.state
  }

  pub fn is_playing(&self) -> bool {
    self.state == PlayerState::Playing
  }

  /// Next beat to be ticked.
  pub fn position(&self) -> Beat {
    self.position
  }

  pub fn bars_position(&self) -> Result<BarsTime, PlayerError> {
    let piece = self.piece.read().map_err(|_| PlayerError::PieceLock)?;
    Ok(BarsTime::from_beats(self.position, piece.signature()))
  }

  pub fn set_loop_enabled(&mut self, enabled: bool) {
    self.loop_enabled = enabled;
  }

  pub fn is_loop_enabled(&self) -> bool {
    self.loop_enabled
  }

  /// Start from the beginning of the piece, or resume after a pause.
  ///
  /// Notes already sustained at the resume position are not turned on again.
  pub fn play(&mut self) -> Result<(), PlayerError> {
    if self.state == PlayerState::Stopped {
      self.position = self.start()?;
    }
    self.state = PlayerState::Playing;
    info!("Playing from beat {}", self.position);
    Ok(())
  }

  pub fn pause(&mut self) -> Result<(), PlayerError> {
    if self.state == PlayerState::Playing {
      self.state = PlayerState::Paused;
      self.sink.send(&scheduler::all_notes_off())?;
      info!("Paused at beat {}", self.position);
    }
    Ok(())
  }

  pub fn stop(&mut self) -> Result<(), PlayerError> {
    if self.state != PlayerState::Stopped {
      self.sink.send(&scheduler::all_notes_off())?;
      info!("Stopped at beat {}", self.position);
    }
    self.state = PlayerState::Stopped;
    self.position = self.start()?;
    Ok(())
  }

  /// Tick the current beat and advance. Returns whether the player is still
  /// playing afterwards; it stops by itself once the end of the piece has
  /// been ticked, unless looping.
  pub fn step(&mut self) -> Result<bool, PlayerError> {
    if self.state != PlayerState::Playing {
      return Ok(false);
    }

    let (tick, start, end) = {
      let piece = self.piece.read().map_err(|_| PlayerError::PieceLock)?;
      (
        scheduler::tick(&piece, self.position),
        piece.start(),
        piece.end(),
      )
    };

    for event in tick.events() {
      self.sink.send(event)?;
    }

    self.position += 1;
    if self.position > end {
      if self.loop_enabled && start < end {
        debug!("Looping back to beat {}", start);
        self.position = start;
      } else {
        debug!("Reached the end of the piece at beat {}", end);
        self.state = PlayerState::Stopped;
        self.position = start;
      }
    }

    Ok(self.is_playing())
  }

  /// Play from the current state until the end, without pacing.
  pub fn play_through(&mut self) -> Result<(), PlayerError> {
    let loop_enabled = self.loop_enabled;
    self.loop_enabled = false;
    let result = self.play().and_then(|_| {
      while self.step()? {}
      Ok(())
    });
    self.loop_enabled = loop_enabled;
    result
  }

  fn start(&self) -> Result<Beat, PlayerError> {
    self
      .piece
      .read()
      .map(|piece| piece.start())
      .map_err(|_| PlayerError::PieceLock)
  }
}
