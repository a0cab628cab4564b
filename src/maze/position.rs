//! Grid coordinates and the four cardinal moves

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `(row, col)` coordinate on the grid, `(0, 0)` being the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Apply the unit offset of `action`, returning `None` when the result
    /// leaves a `size × size` grid.
    pub fn step(self, action: Action, size: usize) -> Option<Position> {
        let (d_row, d_col) = action.offset();
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        (row < size && col < size).then_some(Position { row, col })
    }

    /// Corner diagonally opposite to this one on a `size × size` grid
    pub fn mirrored(self, size: usize) -> Position {
        Position {
            row: size - 1 - self.row,
            col: size - 1 - self.col,
        }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four cardinal moves.
///
/// Ordinals index the Q-table and double as the tie-break order for greedy
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up = 0,
    Left = 1,
    Right = 2,
    Down = 3,
}

impl Action {
    pub const COUNT: usize = 4;

    /// All actions in ordinal order
    pub const ALL: [Action; Action::COUNT] =
        [Action::Up, Action::Left, Action::Right, Action::Down];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// `(row, col)` delta applied by this move
    pub fn offset(self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
            Action::Down => (1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Left => "left",
            Action::Right => "right",
            Action::Down => "down",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
