//! Synchronization Protocol Handler
//!
//! Owns the WebSocket channel to the authoritative server. Local intents
//! go out fire-and-forget; inbound snapshots atomically replace local
//! state (server wins, no merging). Everything runs on one task driven
//! by discrete events, so no locking is needed.
//!
//! Channel lifecycle: Disconnected -> Connecting -> Open -> Closed, with
//! a bounded exponential-backoff reconnect between Open sessions when
//! the configured policy allows it.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use std::collections::BTreeMap;

use crate::game::board::Direction;
use crate::game::events::GameEvent;
use crate::game::movement::{try_move, MoveOutcome};
use crate::game::state::{GameStore, Player};
use crate::identity::{IdentityProvider, StoredIdentity, Username};
use crate::network::endpoint::ClientConfig;
use crate::network::protocol::{
    ClientMessage, GameStateSnapshot, ProtocolError, ServerMessage, UNPLACED_POSITION,
};
use crate::view::BoardView;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Channel lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelState {
    /// No channel yet, or lost and awaiting a reconnect attempt.
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Channel established; messages flow.
    Open,
    /// Terminal: shut down or reconnect budget exhausted.
    Closed,
}

/// A discrete local event fed into the handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A keyboard key, e.g. `ArrowUp`. Unrecognized keys are inert.
    Key(String),
    /// The external game-started signal; enables movement.
    GameStarted,
    /// Stop the client and close the channel.
    Shutdown,
}

/// Client failures that end the run.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// WebSocket connection could not be established.
    #[error("connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    /// The identity collaborator supplied no username for a fresh join.
    #[error("identity collaborator supplied no username")]
    NoIdentity,

    /// No persisted username was available for a rejoin.
    #[error("no persisted username available for rejoin")]
    MissingIdentity,

    /// Every non-obstacle cell is occupied.
    #[error("no free cell to spawn the local player on")]
    BoardFull,
}

enum SessionEnd {
    Shutdown,
    ChannelLost,
}

/// The synchronization client: local store, view, and channel.
pub struct SyncClient<V: BoardView> {
    config: ClientConfig,
    store: GameStore,
    view: V,
    state: ChannelState,
    color: Option<String>,
    event_tx: mpsc::UnboundedSender<GameEvent>,
}

impl<V: BoardView> SyncClient<V> {
    /// Create a client with a fresh store. Returns the client and the
    /// receiver for [`GameEvent`] notifications.
    pub fn new(config: ClientConfig, view: V) -> (Self, mpsc::UnboundedReceiver<GameEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let client = Self {
            config,
            store: GameStore::default(),
            view,
            state: ChannelState::Disconnected,
            color: None,
            event_tx,
        };
        (client, event_rx)
    }

    /// Read access to the owned state.
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Current channel lifecycle state.
    pub fn channel_state(&self) -> ChannelState {
        self.state
    }

    /// Join, connect, and process events until shutdown or until the
    /// channel is lost beyond the reconnect budget.
    pub async fn run(
        mut self,
        identity: &mut dyn IdentityProvider,
        persisted: &dyn StoredIdentity,
        mut input: mpsc::UnboundedReceiver<InputEvent>,
    ) -> Result<(), ClientError> {
        let Some((username, color)) = identity.identity() else {
            error!("identity collaborator supplied no username");
            return Err(ClientError::NoIdentity);
        };
        self.color = Some(color.clone());

        let spawn = {
            let mut rng = rand::thread_rng();
            self.store
                .spawn_local(username.clone(), color, &mut rng)
                .ok_or(ClientError::BoardFull)?
        };
        info!("local player {username} spawned at cell {spawn}");
        self.view.render(&self.store);

        let mut attempts = 0u32;
        let mut rejoining = false;

        loop {
            // A rejoin must be able to restate who we are; the persisted
            // username is a hard precondition for that flow.
            let join_name = if rejoining {
                match persisted.stored_username() {
                    Some(name) => name,
                    None => {
                        error!("no persisted username available for rejoin, aborting");
                        self.state = ChannelState::Closed;
                        return Err(ClientError::MissingIdentity);
                    }
                }
            } else {
                username.clone()
            };

            self.state = ChannelState::Connecting;
            info!("connecting to {}", self.config.endpoint);
            let mut ws = match connect_async(self.config.endpoint.as_str()).await {
                Ok((ws, _)) => ws,
                Err(err) => {
                    error!("connect failed: {err}");
                    if !self.backoff(&mut attempts).await {
                        self.state = ChannelState::Closed;
                        return Err(ClientError::Connect(err));
                    }
                    continue;
                }
            };

            self.state = ChannelState::Open;
            attempts = 0;
            info!("channel open");

            let join = self.join_message(&join_name);
            self.send(&mut ws, &join).await;

            match self.session(&mut ws, &mut input).await {
                SessionEnd::Shutdown => {
                    let _ = ws.close(None).await;
                    self.state = ChannelState::Closed;
                    info!("client shut down");
                    return Ok(());
                }
                SessionEnd::ChannelLost => {
                    self.state = ChannelState::Disconnected;
                    let _ = self.event_tx.send(GameEvent::ChannelClosed);
                    rejoining = true;
                    if !self.backoff(&mut attempts).await {
                        self.state = ChannelState::Closed;
                        info!("channel closed, reconnect budget exhausted");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// One open-channel session: interleave inbound frames and local
    /// input events until the channel drops or shutdown is requested.
    async fn session(
        &mut self,
        ws: &mut WsStream,
        input: &mut mpsc::UnboundedReceiver<InputEvent>,
    ) -> SessionEnd {
        loop {
            tokio::select! {
                frame = ws.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.handle_inbound(&text),
                    Some(Ok(Message::Close(frame))) => {
                        info!("server closed channel: {frame:?}");
                        return SessionEnd::ChannelLost;
                    }
                    Some(Ok(_)) => {} // ping/pong/binary: nothing to do
                    Some(Err(err)) => {
                        error!("channel error: {err}");
                        return SessionEnd::ChannelLost;
                    }
                    None => {
                        info!("channel ended");
                        return SessionEnd::ChannelLost;
                    }
                },
                event = input.recv() => match event {
                    Some(InputEvent::Key(key)) => {
                        if let Some(message) = self.handle_key(&key) {
                            self.send(ws, &message).await;
                        }
                    }
                    Some(InputEvent::GameStarted) => {
                        info!("game started, movement enabled");
                        self.store.mark_game_started();
                        let _ = self.event_tx.send(GameEvent::GameStarted);
                    }
                    Some(InputEvent::Shutdown) | None => return SessionEnd::Shutdown,
                },
            }
        }
    }

    /// Resolve a key press. Returns the move intent to send on an
    /// accepted move; rejected or unrecognized input produces nothing.
    fn handle_key(&mut self, key: &str) -> Option<ClientMessage> {
        let Some(direction) = Direction::from_key(key) else {
            debug!("ignoring key {key:?}");
            return None;
        };

        match try_move(&mut self.store, direction) {
            MoveOutcome::Accepted { position, contact } => {
                self.view.render(&self.store);
                if let Some(contact) = contact {
                    info!("ball contact at cell {}", contact.cell);
                    let _ = self.event_tx.send(GameEvent::BallContact { cell: contact.cell });
                }
                let username = self.store.local_name()?.as_str().to_owned();
                Some(ClientMessage::Move {
                    username,
                    position: position as u32,
                })
            }
            MoveOutcome::Rejected(reason) => {
                debug!("move rejected: {reason:?}");
                None
            }
        }
    }

    /// Dispatch one inbound frame. Unknown types are a forward-compatible
    /// no-op; malformed payloads leave the prior state in effect.
    fn handle_inbound(&mut self, text: &str) {
        match ServerMessage::parse(text) {
            Ok(ServerMessage::UpdateGameState(snapshot)) => self.apply_snapshot(snapshot),
            Err(ProtocolError::UnknownType(kind)) => {
                warn!("ignoring unknown message type {kind:?}");
            }
            Err(ProtocolError::Malformed(err)) => {
                error!("malformed inbound payload, keeping prior state: {err}");
            }
        }
    }

    /// Apply an authoritative snapshot: full replace of the players
    /// collection and ball position, then a single re-render.
    fn apply_snapshot(&mut self, snapshot: GameStateSnapshot) {
        let mut players = BTreeMap::new();
        for (name, entry) in snapshot.players {
            match name.parse::<Username>() {
                Ok(username) => {
                    players.insert(
                        username,
                        Player {
                            position: entry.position as usize,
                            color: entry.color,
                        },
                    );
                }
                Err(_) => warn!("dropping snapshot entry with invalid username {name:?}"),
            }
        }
        let player_count = players.len();

        self.store.set_players(players);
        self.store
            .set_ball_position(snapshot.ball_position.map(|cell| cell as usize));
        self.view.render(&self.store);
        let _ = self.event_tx.send(GameEvent::SnapshotApplied { player_count });
    }

    /// The join announcement for `username`: current position when
    /// spawned, the wire placeholder otherwise.
    fn join_message(&self, username: &Username) -> ClientMessage {
        ClientMessage::NewPlayer {
            username: username.as_str().to_owned(),
            position: self
                .store
                .local_player()
                .map_or(UNPLACED_POSITION, |p| p.position as i64),
            color: self.color.clone().unwrap_or_default(),
        }
    }

    /// Fire-and-forget send. Failures are logged and the message is
    /// dropped; there is no queueing or retry.
    async fn send(&mut self, ws: &mut WsStream, message: &ClientMessage) {
        if self.state != ChannelState::Open {
            error!("cannot send while channel is {:?}, dropping message", self.state);
            return;
        }
        match message.to_json() {
            Ok(json) => {
                debug!("sending {json}");
                if let Err(err) = ws.send(Message::Text(json)).await {
                    error!("send failed, dropping message: {err}");
                }
            }
            Err(err) => error!("failed to encode message: {err}"),
        }
    }

    /// Wait out the backoff for the next attempt. False when the
    /// reconnect budget is spent.
    async fn backoff(&self, attempts: &mut u32) -> bool {
        *attempts += 1;
        if *attempts > self.config.reconnect.max_attempts {
            return false;
        }
        let delay = self.config.reconnect.delay_for(*attempts);
        info!(
            "reconnect attempt {} of {} in {:?}",
            attempts, self.config.reconnect.max_attempts, delay
        );
        tokio::time::sleep(delay).await;
        true
    }
}
