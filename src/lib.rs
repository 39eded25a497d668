//! # Gridball Client Engine
//!
//! Client-side logic for the Gridball real-time multiplayer grid game:
//! local state model, movement and collision resolution, and the
//! reconciliation protocol with the authoritative server.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      GRIDBALL CLIENT                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  game/           - Local game model (no I/O)                 │
//! │  ├── board.rs    - Fixed 11x10 grid topology, obstacles      │
//! │  ├── state.rs    - Owned store: players, ball, phase         │
//! │  ├── movement.rs - Move validation, optimistic updates       │
//! │  ├── collision.rs- Player vs ball contact detection          │
//! │  └── events.rs   - Notifications for the embedder            │
//! │                                                              │
//! │  network/        - Server synchronization                    │
//! │  ├── protocol.rs - JSON wire envelopes (type-tagged)         │
//! │  ├── endpoint.rs - Endpoint selection, reconnect policy      │
//! │  └── client.rs   - Channel state machine, event loop         │
//! │                                                              │
//! │  identity.rs     - Username validation, identity seams       │
//! │  view.rs         - Rendering seam + terminal view            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Authority Model
//!
//! The server is always right. Local moves are applied optimistically
//! and claimed via fire-and-forget intents; every inbound snapshot is an
//! atomic full replace of the players collection and ball state. The
//! client never merges, never rolls back on its own, and never moves the
//! ball.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod game;
pub mod identity;
pub mod network;
pub mod view;

// Re-export commonly used types
pub use game::board::{Board, Direction};
pub use game::collision::{check_ball_contact, BallContact};
pub use game::events::GameEvent;
pub use game::movement::{try_move, MoveOutcome, MoveRejection};
pub use game::state::{Ball, GamePhase, GameStore, Player};
pub use identity::{EnvIdentity, IdentityProvider, InvalidUsername, StoredIdentity, Username};
pub use network::client::{ChannelState, ClientError, InputEvent, SyncClient};
pub use network::endpoint::{select_endpoint, ClientConfig, ReconnectPolicy};
pub use network::protocol::{ClientMessage, GameStateSnapshot, ProtocolError, ServerMessage};
pub use view::{AsciiView, BoardView, NullView};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Board width in cells.
pub const BOARD_COLUMNS: usize = 11;

/// Board height in cells.
pub const BOARD_ROWS: usize = 10;

/// Column blocked by obstacles, one cell per row.
pub const OBSTACLE_COLUMN: usize = 5;

/// The ball's fixed starting cell.
pub const BALL_START_CELL: usize = 5;
