//! Game Logic Module
//!
//! Local game model and resolution rules. Pure with respect to the
//! network: everything here operates on the owned [`state::GameStore`].
//!
//! ## Module Structure
//!
//! - `board`: fixed grid topology and obstacle membership
//! - `state`: players, ball, local identity, match phase
//! - `movement`: directional move validation and optimistic updates
//! - `collision`: local player vs ball contact detection
//! - `events`: notifications surfaced to the embedder

pub mod board;
pub mod collision;
pub mod events;
pub mod movement;
pub mod state;

// Re-export key types
pub use board::{Board, Direction};
pub use collision::BallContact;
pub use events::GameEvent;
pub use movement::{try_move, MoveOutcome, MoveRejection};
pub use state::{Ball, GamePhase, GameStore, Player};
