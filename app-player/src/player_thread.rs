use std::thread;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use failure::Fail;
use log::{debug, error, info};

use cadence_core::playback::{PlaybackSink, Player, PlayerError};

#[derive(Debug, Fail)]
pub enum PlayerThreadError {
  #[fail(display = "Failed to create the player thread: {}", cause)]
  Start { cause: String },

  #[fail(display = "Failed to send {:?} to the player thread", protocol)]
  Send { protocol: Protocol },

  #[fail(display = "Failed to join the player thread")]
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
  Play,
  Pause,
  Stop,
  Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
  Looped,
  Finished,
}

struct PlayerLoop<S: PlaybackSink> {
  player: Player<S>,
  notification_tx: Sender<Notification>,
}

impl<S: PlaybackSink> PlayerLoop<S> {
  fn new(player: Player<S>, notification_tx: Sender<Notification>) -> PlayerLoop<S> {
    PlayerLoop {
      player,
      notification_tx,
    }
  }

  fn run(&mut self, protocol_rx: Receiver<Protocol>) {
    loop {
      let next = if self.player.is_playing() {
        protocol_rx.recv_timeout(self.beat_duration())
      } else {
        protocol_rx
          .recv()
          .map_err(|_| RecvTimeoutError::Disconnected)
      };

      match next {
        Ok(Protocol::Quit) => {
          report(self.player.stop());
          break;
        }
        Ok(protocol) => self.handle(protocol),
        Err(RecvTimeoutError::Timeout) => self.step(),
        Err(RecvTimeoutError::Disconnected) => {
          debug!("Protocol channel closed");
          report(self.player.stop());
          break;
        }
      }
    }
  }

  fn handle(&mut self, protocol: Protocol) {
    debug!("Received {:?}", protocol);
    let result = match protocol {
      Protocol::Play => self.player.play(),
      Protocol::Pause => self.player.pause().and_then(|()| {
        let position = self.player.bars_position()?;
        info!("Paused at {:?}", position);
        Ok(())
      }),
      Protocol::Stop | Protocol::Quit => self.player.stop(),
    };
    report(result);
  }

  fn step(&mut self) {
    let before = self.player.position();
    match self.player.step() {
      Ok(true) if self.player.position() < before => self.notify(Notification::Looped),
      Ok(true) => {}
      Ok(false) => self.notify(Notification::Finished),
      Err(err) => {
        error!("Playback failed at beat {}: {}", before, err);
        report(self.player.stop());
        self.notify(Notification::Finished);
      }
    }
  }

  fn beat_duration(&self) -> std::time::Duration {
    self
      .player
      .piece()
      .read()
      .map(|piece| piece.tempo())
      .unwrap_or_default()
      .beat_duration()
  }

  fn notify(&self, notification: Notification) {
    if self.notification_tx.send(notification).is_err() {
      debug!("Nobody listening for {:?}", notification);
    }
  }
}

fn report(result: Result<(), PlayerError>) {
  if let Err(err) = result {
    error!("{}", err);
  }
}

/// Drives a [`Player`] on its own thread, one step per beat of the piece's tempo.
pub struct PlayerThread {
  handler: JoinHandle<()>,
  protocol_tx: Sender<Protocol>,
}

impl PlayerThread {
  pub const CHANNEL_CAPACITY: usize = 64;

  pub fn start<S>(
    player: Player<S>,
    notification_tx: Sender<Notification>,
  ) -> Result<PlayerThread, PlayerThreadError>
  where
    S: PlaybackSink + Send + 'static,
  {
    info!("Starting the player ...");

    let (protocol_tx, protocol_rx) = crossbeam_channel::bounded::<Protocol>(Self::CHANNEL_CAPACITY);

    thread::Builder::new()
      .name("player".into())
      .spawn(move || PlayerLoop::new(player, notification_tx).run(protocol_rx))
      .map_err(|err| PlayerThreadError::Start {
        cause: err.to_string(),
      })
      .map(|handler| PlayerThread {
        handler,
        protocol_tx,
      })
  }

  pub fn send(&self, protocol: Protocol) -> Result<(), PlayerThreadError> {
    self
      .protocol_tx
      .send(protocol)
      .map_err(|_| PlayerThreadError::Send { protocol })
  }

  pub fn stop(self) -> Result<(), PlayerThreadError> {
    info!("Stopping the player ...");

    self
      .send(Protocol::Quit)
      .and_then(|()| self.handler.join().map_err(|_| PlayerThreadError::Stop))
  }
}

#[cfg(test)]
mod test {

  use std::sync::{Arc, RwLock};
  use std::time::Duration;

  use super::{Notification, PlayerThread, Protocol};
  use cadence_core::piece::{CompositionBuilder, PieceBuilder};
  use cadence_core::playback::{PlaybackEvent, PlaybackSink, Player, SinkError};

  use crossbeam_channel::Sender;

  struct ChannelSink(Sender<PlaybackEvent>);

  impl PlaybackSink for ChannelSink {
    fn send(&mut self, event: &PlaybackEvent) -> Result<(), SinkError> {
      self.0.send(*event).map_err(|err| SinkError::Send {
        cause: err.to_string(),
      })
    }
  }

  #[test]
  /// A fast piece plays to the end and reports it
  pub fn player_thread_plays_to_the_end() {
    let mut builder = PieceBuilder::new();
    builder
      .set_tempo(1_000)
      .add_note(0, 2, 1, 60, 100)
      .unwrap()
      .add_note(2, 3, 1, 62, 100)
      .unwrap();
    let piece = Arc::new(RwLock::new(builder.build().unwrap()));

    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let (notification_tx, notification_rx) = crossbeam_channel::unbounded();
    let player = Player::new(piece, ChannelSink(event_tx));
    let thread = PlayerThread::start(player, notification_tx).unwrap();

    thread.send(Protocol::Play).unwrap();
    assert_eq!(
      notification_rx.recv_timeout(Duration::from_secs(5)),
      Ok(Notification::Finished)
    );
    thread.stop().unwrap();

    let ons = event_rx
      .try_iter()
      .filter(|event| match event {
        PlaybackEvent::NoteOn { .. } => true,
        _ => false,
      })
      .count();
    assert_eq!(ons, 2);
  }
}
