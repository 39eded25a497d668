//! Game Events
//!
//! Notifications surfaced to the embedder. The engine recognizes
//! conditions and reports them; consequences stay server-authoritative.

use serde::{Deserialize, Serialize};

/// An event observed by the local engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The local player landed on the ball's cell.
    BallContact {
        /// The shared cell.
        cell: usize,
    },

    /// An authoritative snapshot replaced the local state.
    SnapshotApplied {
        /// Number of players in the snapshot.
        player_count: usize,
    },

    /// The match started; movement is now allowed.
    GameStarted,

    /// The channel to the server was lost.
    ChannelClosed,
}
