//! Board Topology
//!
//! Pure geometry for the fixed Gridball board: cell adjacency and
//! obstacle membership. Immutable after construction, no dependencies
//! on the rest of the game state.

use crate::{BALL_START_CELL, BOARD_COLUMNS, BOARD_ROWS, OBSTACLE_COLUMN};

/// A movement direction on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// One row up.
    Up,
    /// One row down.
    Down,
    /// One column left.
    Left,
    /// One column right.
    Right,
}

impl Direction {
    /// All four directions, for exhaustive checks.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Map a keyboard key name to a direction.
    ///
    /// Unrecognized keys yield `None`; invalid input is inert, never an error.
    pub fn from_key(key: &str) -> Option<Direction> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// The fixed game board.
///
/// A `columns` x `rows` grid of cells addressed by index in row-major
/// order. One full column is blocked by obstacles: every cell whose
/// `index % columns` equals the obstacle column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    columns: usize,
    rows: usize,
    obstacle_column: usize,
}

impl Board {
    /// Create a board. `obstacle_column` must be less than `columns`.
    pub const fn new(columns: usize, rows: usize, obstacle_column: usize) -> Self {
        Self {
            columns,
            rows,
            obstacle_column,
        }
    }

    /// Board width in cells.
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Board height in cells.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells.
    pub const fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Whether `cell` is a valid index on this board.
    pub const fn contains(&self, cell: usize) -> bool {
        cell < self.cell_count()
    }

    /// Row of a cell.
    pub const fn row(&self, cell: usize) -> usize {
        cell / self.columns
    }

    /// Column of a cell.
    pub const fn column(&self, cell: usize) -> usize {
        cell % self.columns
    }

    /// The neighboring cell in `direction`, or `None` at a board edge.
    ///
    /// Never returns an index outside `[0, cell_count)`.
    pub fn neighbor(&self, cell: usize, direction: Direction) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        match direction {
            Direction::Up if cell >= self.columns => Some(cell - self.columns),
            Direction::Down if cell < self.cell_count() - self.columns => {
                Some(cell + self.columns)
            }
            Direction::Left if cell % self.columns != 0 => Some(cell - 1),
            Direction::Right if cell % self.columns != self.columns - 1 => Some(cell + 1),
            _ => None,
        }
    }

    /// Obstacle membership: a pure function of the index.
    pub const fn is_obstacle(&self, cell: usize) -> bool {
        cell % self.columns == self.obstacle_column
    }

    /// All obstacle cells, one per row.
    pub fn obstacle_cells(&self) -> Vec<usize> {
        (0..self.cell_count())
            .filter(|&cell| self.is_obstacle(cell))
            .collect()
    }

    /// The ball's fixed starting cell.
    pub const fn ball_start_cell(&self) -> usize {
        BALL_START_CELL
    }
}

impl Default for Board {
    /// The production 11x10 board with the obstacle in column 5.
    fn default() -> Self {
        Self::new(BOARD_COLUMNS, BOARD_ROWS, OBSTACLE_COLUMN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_board_shape() {
        let board = Board::default();
        assert_eq!(board.columns(), 11);
        assert_eq!(board.rows(), 10);
        assert_eq!(board.cell_count(), 110);
    }

    #[test]
    fn test_neighbor_interior_cell() {
        let board = Board::default();
        // Cell 17 is row 1, column 6.
        assert_eq!(board.neighbor(17, Direction::Up), Some(6));
        assert_eq!(board.neighbor(17, Direction::Down), Some(28));
        assert_eq!(board.neighbor(17, Direction::Left), Some(16));
        assert_eq!(board.neighbor(17, Direction::Right), Some(18));
    }

    #[test]
    fn test_neighbor_edges() {
        let board = Board::default();
        // Top row has no up.
        assert_eq!(board.neighbor(0, Direction::Up), None);
        assert_eq!(board.neighbor(10, Direction::Up), None);
        // Bottom row has no down.
        assert_eq!(board.neighbor(99, Direction::Down), None);
        assert_eq!(board.neighbor(109, Direction::Down), None);
        // Leftmost column has no left.
        assert_eq!(board.neighbor(22, Direction::Left), None);
        // Rightmost column has no right.
        assert_eq!(board.neighbor(21, Direction::Right), None);
    }

    #[test]
    fn test_neighbor_out_of_range_cell() {
        let board = Board::default();
        for direction in Direction::ALL {
            assert_eq!(board.neighbor(110, direction), None);
            assert_eq!(board.neighbor(usize::MAX, direction), None);
        }
    }

    #[test]
    fn test_obstacle_membership() {
        let board = Board::default();
        for cell in 0..board.cell_count() {
            assert_eq!(board.is_obstacle(cell), cell % 11 == 5, "cell {cell}");
        }
    }

    #[test]
    fn test_obstacle_count_one_per_row() {
        let board = Board::default();
        let obstacles = board.obstacle_cells();
        assert_eq!(obstacles.len(), board.rows());
        assert_eq!(obstacles[0], 5);
        assert_eq!(obstacles[9], 104);
    }

    #[test]
    fn test_direction_from_key() {
        assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(Direction::from_key("ArrowDown"), Some(Direction::Down));
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(Direction::from_key("Enter"), None);
        assert_eq!(Direction::from_key(""), None);
    }

    proptest! {
        #[test]
        fn prop_neighbor_stays_in_bounds(cell in 0usize..200, dir_idx in 0usize..4) {
            let board = Board::default();
            let direction = Direction::ALL[dir_idx];
            if let Some(next) = board.neighbor(cell, direction) {
                prop_assert!(board.contains(next));
                // Moving is one step: same row +/- a column, or same column +/- a row.
                let row_delta = board.row(next) as i64 - board.row(cell) as i64;
                let col_delta = board.column(next) as i64 - board.column(cell) as i64;
                prop_assert_eq!(row_delta.abs() + col_delta.abs(), 1);
            }
        }
    }
}
