//! Cell types stored in the maze grid

use serde::{Deserialize, Serialize};

/// Semantics of one grid square
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Walkable, neutral cell
    #[default]
    Air,
    /// Impassable cell; bumping into it costs a penalty
    Wall,
    /// Lethal cell; entering it ends the episode
    Danger,
    /// Goal cell; entering it ends the episode successfully
    Reward,
    /// Label for the spawn location. Never stored in a grid: the cell under
    /// the spawn coordinates is `Air`.
    Spawn,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Air => '.',
            Cell::Wall => '#',
            Cell::Danger => 'X',
            Cell::Reward => 'G',
            Cell::Spawn => 'S',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Air),
            '#' => Some(Cell::Wall),
            'X' | 'x' => Some(Cell::Danger),
            'G' | 'g' => Some(Cell::Reward),
            'S' | 's' => Some(Cell::Spawn),
            _ => None,
        }
    }

    /// Label used by renderers to pick a colour or legend entry
    pub fn label(self) -> &'static str {
        match self {
            Cell::Air => "air",
            Cell::Wall => "wall",
            Cell::Danger => "danger",
            Cell::Reward => "reward",
            Cell::Spawn => "spawn",
        }
    }

    /// Whether the connectivity search may pass through this cell
    pub fn is_passable(self) -> bool {
        !matches!(self, Cell::Wall | Cell::Danger)
    }
}
