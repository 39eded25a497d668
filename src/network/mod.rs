//! Network Layer
//!
//! WebSocket client for real-time synchronization with the
//! authoritative game server. All game rules live in `game/`; this
//! layer only moves intents out and snapshots in.

pub mod client;
pub mod endpoint;
pub mod protocol;

pub use client::{ChannelState, ClientError, InputEvent, SyncClient};
pub use endpoint::{select_endpoint, ClientConfig, ReconnectPolicy};
pub use protocol::{
    ClientMessage, GameStateSnapshot, PlayerSnapshot, ProtocolError, ServerMessage,
};
