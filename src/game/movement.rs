//! Movement Resolution
//!
//! Validates a requested directional move against the phase gate, board
//! topology, obstacles, and occupancy, then applies the optimistic local
//! update. The caller is responsible for emitting the move intent to the
//! server on acceptance.

use crate::game::board::Direction;
use crate::game::collision::{check_ball_contact, BallContact};
use crate::game::state::GameStore;

/// Why a move request was rejected. Rejections have no side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveRejection {
    /// The match has not started; movement is globally gated.
    NotStarted,
    /// No local player has joined yet.
    NoLocalPlayer,
    /// The board has no cell in that direction.
    OffBoard,
    /// The candidate cell is an obstacle.
    Obstacle,
    /// The candidate cell is occupied by another player.
    Occupied,
}

/// Outcome of a move request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Move applied locally; the new position must be claimed with the
    /// server via a move intent.
    Accepted {
        /// The new local position.
        position: usize,
        /// Ball contact triggered by this move, if any.
        contact: Option<BallContact>,
    },
    /// Move rejected; the player stays put and nothing is sent.
    Rejected(MoveRejection),
}

/// Try to move the local player one cell in `direction`.
///
/// Rule order: phase gate, topology, obstacle, occupancy. The ball never
/// blocks a move; landing on its cell is allowed and triggers collision
/// evaluation instead (skipped while the ball is in transit).
///
/// Acceptance updates the store optimistically. There is no rollback:
/// the next authoritative snapshot corrects any divergence.
pub fn try_move(store: &mut GameStore, direction: Direction) -> MoveOutcome {
    if !store.can_move() {
        return MoveOutcome::Rejected(MoveRejection::NotStarted);
    }

    let Some(player) = store.local_player() else {
        return MoveOutcome::Rejected(MoveRejection::NoLocalPlayer);
    };

    let Some(candidate) = store.board().neighbor(player.position, direction) else {
        return MoveOutcome::Rejected(MoveRejection::OffBoard);
    };

    if store.board().is_obstacle(candidate) {
        return MoveOutcome::Rejected(MoveRejection::Obstacle);
    }

    if store.is_occupied_by_other(candidate) {
        return MoveOutcome::Rejected(MoveRejection::Occupied);
    }

    store.set_local_position(candidate);
    let contact = check_ball_contact(store);

    MoveOutcome::Accepted {
        position: candidate,
        contact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Player;
    use crate::identity::Username;
    use std::collections::BTreeMap;

    fn name(s: &str) -> Username {
        s.parse().unwrap()
    }

    fn started_store_with_local_at(cell: usize) -> GameStore {
        let mut store = GameStore::default();
        let mut rng = rand::thread_rng();
        store.spawn_local(name("alice"), "#fff".into(), &mut rng).unwrap();
        store.set_local_position(cell);
        store.mark_game_started();
        store
    }

    fn add_player(store: &mut GameStore, who: &str, position: usize) {
        let mut players = store.players().clone();
        players.insert(
            name(who),
            Player {
                position,
                color: "#000".into(),
            },
        );
        store.set_players(players);
    }

    #[test]
    fn test_gated_before_game_start() {
        let mut store = GameStore::default();
        let mut rng = rand::thread_rng();
        store.spawn_local(name("alice"), "#fff".into(), &mut rng).unwrap();
        store.set_local_position(20);

        for direction in Direction::ALL {
            let outcome = try_move(&mut store, direction);
            assert_eq!(outcome, MoveOutcome::Rejected(MoveRejection::NotStarted));
            assert_eq!(store.local_player().unwrap().position, 20, "no side effect");
        }
    }

    #[test]
    fn test_accepted_move_updates_position() {
        let mut store = started_store_with_local_at(0);
        let outcome = try_move(&mut store, Direction::Right);
        assert_eq!(
            outcome,
            MoveOutcome::Accepted {
                position: 1,
                contact: None,
            }
        );
        assert_eq!(store.local_player().unwrap().position, 1);
    }

    #[test]
    fn test_edge_move_rejected() {
        let mut store = started_store_with_local_at(0);
        assert_eq!(
            try_move(&mut store, Direction::Up),
            MoveOutcome::Rejected(MoveRejection::OffBoard)
        );
        assert_eq!(
            try_move(&mut store, Direction::Left),
            MoveOutcome::Rejected(MoveRejection::OffBoard)
        );
        assert_eq!(store.local_player().unwrap().position, 0);
    }

    #[test]
    fn test_move_onto_obstacle_rejected() {
        // Cell 17 is row 1, column 6; its left neighbor 16 is in the
        // obstacle column.
        let mut store = started_store_with_local_at(17);
        let outcome = try_move(&mut store, Direction::Left);
        assert_eq!(outcome, MoveOutcome::Rejected(MoveRejection::Obstacle));
        assert_eq!(store.local_player().unwrap().position, 17);
    }

    #[test]
    fn test_obstacle_rejected_even_if_occupied() {
        // Obstacle wins over occupancy: the check order never reaches
        // occupancy for an obstacle cell.
        let mut store = started_store_with_local_at(17);
        add_player(&mut store, "bob", 16);
        assert_eq!(
            try_move(&mut store, Direction::Left),
            MoveOutcome::Rejected(MoveRejection::Obstacle)
        );
    }

    #[test]
    fn test_move_onto_other_player_rejected() {
        let mut store = started_store_with_local_at(0);
        add_player(&mut store, "bob", 1);
        let outcome = try_move(&mut store, Direction::Right);
        assert_eq!(outcome, MoveOutcome::Rejected(MoveRejection::Occupied));
        assert_eq!(store.local_player().unwrap().position, 0);
    }

    #[test]
    fn test_move_onto_ball_cell_accepted_with_contact() {
        // Player one cell right of a resting ball, on a non-obstacle
        // column: player at 23, ball at 22 (row 2).
        let mut store = started_store_with_local_at(23);
        store.set_ball_position(Some(22));

        let outcome = try_move(&mut store, Direction::Left);
        assert_eq!(
            outcome,
            MoveOutcome::Accepted {
                position: 22,
                contact: Some(BallContact { cell: 22 }),
            }
        );
    }

    #[test]
    fn test_ball_in_transit_suppresses_contact() {
        let mut store = started_store_with_local_at(23);
        store.set_ball_position(Some(22));
        store.set_ball_moving(true);

        let outcome = try_move(&mut store, Direction::Left);
        assert_eq!(
            outcome,
            MoveOutcome::Accepted {
                position: 22,
                contact: None,
            }
        );
    }

    #[test]
    fn test_ball_only_cell_is_not_occupied() {
        // The ball alone never blocks a move.
        let mut store = started_store_with_local_at(0);
        store.set_ball_position(Some(1));
        let outcome = try_move(&mut store, Direction::Right);
        assert!(matches!(outcome, MoveOutcome::Accepted { position: 1, .. }));
    }
}
