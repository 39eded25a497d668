//! Game State Store
//!
//! The single owned home of all mutable session state: the players
//! collection, the ball, the local identity, and the match phase. Every
//! mutation goes through the store; no other component keeps copies.
//!
//! Snapshot application is all-or-nothing: a replacement map is built
//! first and swapped in whole, so readers never observe a partially
//! applied snapshot.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::board::Board;
use crate::identity::Username;

// =============================================================================
// PLAYER AND BALL
// =============================================================================

/// A player on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Cell index occupied by this player.
    pub position: usize,
    /// Color identifier, e.g. `#ff8800`.
    pub color: String,
}

/// The shared ball.
///
/// The client never moves the ball on its own: position and transit
/// flag change only when the server says so (single-writer invariant).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    position: Option<usize>,
    moving: bool,
}

impl Ball {
    /// A resting ball at `cell`.
    pub fn at(cell: usize) -> Self {
        Self {
            position: Some(cell),
            moving: false,
        }
    }

    /// Current cell, or `None` while off-board.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Whether the ball is on the board at all.
    pub fn on_board(&self) -> bool {
        self.position.is_some()
    }

    /// Whether the ball is in server-driven transit. Local collision
    /// checks are suppressed while true.
    pub fn moving(&self) -> bool {
        self.moving
    }
}

// =============================================================================
// MATCH PHASE
// =============================================================================

/// Match phase gating local movement.
///
/// Movement is allowed only in `Playing`. The transition is driven by an
/// explicit game-started event, never toggled ad hoc.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the match to start; all move requests are rejected.
    #[default]
    Lobby,
    /// Match running; moves are resolved normally.
    Playing,
}

// =============================================================================
// GAME STORE
// =============================================================================

/// Owned state of one connected session.
#[derive(Clone, Debug)]
pub struct GameStore {
    board: Board,
    players: BTreeMap<Username, Player>,
    ball: Ball,
    local: Option<Username>,
    phase: GamePhase,
}

impl GameStore {
    /// Create a store for `board` with the ball at its starting cell.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            players: BTreeMap::new(),
            ball: Ball::at(board.ball_start_cell()),
            local: None,
            phase: GamePhase::Lobby,
        }
    }

    /// The board topology.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current match phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Apply the external game-started signal. Idempotent, one-way.
    pub fn mark_game_started(&mut self) {
        self.phase = GamePhase::Playing;
    }

    /// Whether a local move intent may be issued: the match has started
    /// and a local identity is set.
    pub fn can_move(&self) -> bool {
        self.phase == GamePhase::Playing && self.local.is_some()
    }

    /// The local player's username, once joined.
    pub fn local_name(&self) -> Option<&Username> {
        self.local.as_ref()
    }

    /// The local player's state, if present in the collection.
    pub fn local_player(&self) -> Option<&Player> {
        self.players.get(self.local.as_ref()?)
    }

    /// Look up any player by name.
    pub fn player(&self, username: &Username) -> Option<&Player> {
        self.players.get(username)
    }

    /// All players, keyed by username.
    pub fn players(&self) -> &BTreeMap<Username, Player> {
        &self.players
    }

    /// The ball.
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Optimistically place the local player on a random free cell
    /// (not an obstacle, not occupied by another player).
    ///
    /// Designates `username` as the local identity and returns the
    /// assigned cell, or `None` if the board has no free cell left.
    pub fn spawn_local<R: Rng>(
        &mut self,
        username: Username,
        color: String,
        rng: &mut R,
    ) -> Option<usize> {
        let free: Vec<usize> = (0..self.board.cell_count())
            .filter(|&cell| !self.board.is_obstacle(cell))
            .filter(|&cell| !self.players.values().any(|p| p.position == cell))
            .collect();
        if free.is_empty() {
            return None;
        }

        let position = free[rng.gen_range(0..free.len())];
        self.players.insert(username.clone(), Player { position, color });
        self.local = Some(username);
        Some(position)
    }

    /// Update the local player's position after a locally accepted move.
    ///
    /// Optimistic: not rolled back on server disagreement, the next
    /// authoritative snapshot corrects any divergence.
    pub fn set_local_position(&mut self, cell: usize) {
        if let Some(name) = &self.local {
            if let Some(player) = self.players.get_mut(name) {
                player.position = cell;
            }
        }
    }

    /// Atomically replace the whole players collection with a server
    /// snapshot.
    ///
    /// Reconciliation rule: snapshots are full replaces, so a username
    /// absent from the snapshot is a departure; there is no explicit
    /// player-left signal in this protocol. Any optimistic local move
    /// not yet reflected by the server is overwritten; the server wins.
    pub fn set_players(&mut self, snapshot: BTreeMap<Username, Player>) {
        self.players = snapshot;
    }

    /// Atomically replace the ball position. `None` means off-board.
    pub fn set_ball_position(&mut self, position: Option<usize>) {
        self.ball.position = position;
    }

    /// Set the server-driven transit flag.
    pub fn set_ball_moving(&mut self, moving: bool) {
        self.ball.moving = moving;
    }

    /// Whether `cell` is occupied by a player other than the local one.
    pub fn is_occupied_by_other(&self, cell: usize) -> bool {
        self.players
            .iter()
            .filter(|(name, _)| Some(*name) != self.local.as_ref())
            .any(|(_, player)| player.position == cell)
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new(Board::default())
    }
}
