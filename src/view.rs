//! Rendering Seam
//!
//! The engine does not draw; it hands the whole store to a
//! [`BoardView`] after every state change worth showing. Views must be
//! idempotent full redraws: each call clears whatever was shown before,
//! so repeated renders never accumulate artifacts.

use std::fmt::Write as _;

use crate::game::state::GameStore;

/// A rendering collaborator.
pub trait BoardView {
    /// Redraw the whole board from the current store contents.
    fn render(&mut self, store: &GameStore);
}

/// A view that draws nothing. Useful for tests and headless embedding.
#[derive(Debug, Default)]
pub struct NullView;

impl BoardView for NullView {
    fn render(&mut self, _store: &GameStore) {}
}

/// Terminal view: one character per cell, one line per row.
///
/// `#` obstacle, `o` ball, `@` the local player, `*` any other player,
/// `.` empty. A player standing on the ball's cell is drawn as the
/// player.
#[derive(Debug, Default)]
pub struct AsciiView {
    last_frame: String,
}

impl AsciiView {
    /// Create a view.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently rendered frame.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    fn draw(store: &GameStore) -> String {
        let board = store.board();
        let local = store.local_name();
        let mut frame = String::new();

        for row in 0..board.rows() {
            for col in 0..board.columns() {
                let cell = row * board.columns() + col;
                let occupant = store
                    .players()
                    .iter()
                    .find(|(_, player)| player.position == cell);

                let glyph = if let Some((name, _)) = occupant {
                    if Some(name) == local {
                        '@'
                    } else {
                        '*'
                    }
                } else if store.ball().on_board() && store.ball().position() == Some(cell) {
                    'o'
                } else if board.is_obstacle(cell) {
                    '#'
                } else {
                    '.'
                };
                frame.push(glyph);
            }
            frame.push('\n');
        }
        frame
    }
}

impl BoardView for AsciiView {
    fn render(&mut self, store: &GameStore) {
        let mut frame = Self::draw(store);
        let _ = write!(frame, "phase: {:?}", store.phase());
        println!("{frame}");
        self.last_frame = frame;
    }
}
