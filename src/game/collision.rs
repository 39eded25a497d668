//! Collision Detection
//!
//! Recognizes when the local player and the ball share a cell. The
//! detector only reports the condition; the consequence (possession
//! change, scoring) is arbitrated by the server, so the ball is never
//! mutated here.

use serde::{Deserialize, Serialize};

use crate::game::state::GameStore;

/// The local player and the ball occupy the same cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallContact {
    /// The shared cell.
    pub cell: usize,
}

/// Check whether the local player currently touches the ball.
///
/// A contact is reported only when the ball is on the board and not in
/// server-driven transit; while the ball is moving, local checks are
/// suppressed entirely.
pub fn check_ball_contact(store: &GameStore) -> Option<BallContact> {
    let ball = store.ball();
    if ball.moving() {
        return None;
    }

    let cell = ball.position()?;
    let player = store.local_player()?;
    if player.position == cell {
        Some(BallContact { cell })
    } else {
        None
    }
}
