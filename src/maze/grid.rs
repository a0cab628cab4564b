//! Grid storage and the generated maze

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Cell, MAX_GRID_SIZE, MIN_GRID_SIZE, Position, connectivity};
use crate::{Error, Result};

/// Square matrix of cells stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// All-air grid of side `size`
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Air; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at `position`. Panics if the position is outside the grid.
    pub fn get(&self, position: Position) -> Cell {
        self.cells[self.idx(position)]
    }

    pub(crate) fn set(&mut self, position: Position, cell: Cell) {
        let idx = self.idx(position);
        self.cells[idx] = cell;
    }

    /// Rows of the grid, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size)
    }

    /// Number of cells of the given kind
    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    fn idx(&self, position: Position) -> usize {
        position.row * self.size + position.col
    }
}

/// Requested versus placed obstacle counts for one generation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleReport {
    pub wall_target: usize,
    pub danger_target: usize,
    pub walls_placed: usize,
    pub dangers_placed: usize,
}

impl ObstacleReport {
    /// Whether both placement loops reached their targets before the
    /// attempt caps ran out
    pub fn is_complete(&self) -> bool {
        self.walls_placed == self.wall_target && self.dangers_placed == self.danger_target
    }
}

/// An immutable maze: grid contents plus spawn and reward anchors.
///
/// Every `Maze` satisfies the connectivity invariant: a path of non-wall,
/// non-danger cells links `spawn` to `reward`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    grid: Grid,
    spawn: Position,
    reward: Position,
    report: ObstacleReport,
}

impl Maze {
    pub(crate) fn from_parts(
        grid: Grid,
        spawn: Position,
        reward: Position,
        report: ObstacleReport,
    ) -> Self {
        Self {
            grid,
            spawn,
            reward,
            report,
        }
    }

    /// Build a maze from a text layout, one row per line.
    ///
    /// Characters follow [`Cell::from_char`]: `.` air, `#` wall, `X` danger,
    /// `G` reward and `S` spawn. Blank lines and surrounding whitespace are
    /// ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use qmaze::maze::{Cell, Maze, Position};
    ///
    /// let maze = Maze::parse(
    ///     "G....
    ///      .##..
    ///      ..X..
    ///      .....
    ///      ....S",
    /// )?;
    /// assert_eq!(maze.size(), 5);
    /// assert_eq!(maze.spawn(), Position::new(4, 4));
    /// assert_eq!(maze.cell(Position::new(2, 2)), Cell::Danger);
    /// # Ok::<(), qmaze::Error>(())
    /// ```
    pub fn parse(layout: &str) -> Result<Self> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let size = rows.len();
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            return Err(Error::InvalidSize { size });
        }

        let mut grid = Grid::new(size);
        let mut spawn = None;
        let mut reward = None;

        for (row, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != size {
                return Err(Error::InvalidLayout {
                    reason: format!(
                        "row {row} has {} cells, expected {size}",
                        chars.len()
                    ),
                });
            }

            for (col, &c) in chars.iter().enumerate() {
                let position = Position::new(row, col);
                let cell = Cell::from_char(c).ok_or_else(|| Error::InvalidLayout {
                    reason: format!("unknown cell character '{c}' at {position}"),
                })?;

                match cell {
                    Cell::Spawn => {
                        if spawn.replace(position).is_some() {
                            return Err(Error::InvalidLayout {
                                reason: "more than one spawn cell".to_string(),
                            });
                        }
                    }
                    Cell::Reward => {
                        if reward.replace(position).is_some() {
                            return Err(Error::InvalidLayout {
                                reason: "more than one reward cell".to_string(),
                            });
                        }
                        grid.set(position, Cell::Reward);
                    }
                    other => grid.set(position, other),
                }
            }
        }

        let spawn = spawn.ok_or_else(|| Error::InvalidLayout {
            reason: "missing spawn cell".to_string(),
        })?;
        let reward = reward.ok_or_else(|| Error::InvalidLayout {
            reason: "missing reward cell".to_string(),
        })?;

        if !connectivity::is_connected(&grid, spawn, reward) {
            return Err(Error::InvalidLayout {
                reason: format!("no walkable path from spawn {spawn} to reward {reward}"),
            });
        }

        let report = ObstacleReport {
            wall_target: grid.count(Cell::Wall),
            danger_target: grid.count(Cell::Danger),
            walls_placed: grid.count(Cell::Wall),
            dangers_placed: grid.count(Cell::Danger),
        };

        Ok(Self::from_parts(grid, spawn, reward, report))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn spawn(&self) -> Position {
        self.spawn
    }

    pub fn reward(&self) -> Position {
        self.reward
    }

    pub fn cell(&self, position: Position) -> Cell {
        self.grid.get(position)
    }

    pub fn obstacle_report(&self) -> ObstacleReport {
        self.report
    }

    /// Length of the shortest walkable path from spawn to reward
    pub fn shortest_path_length(&self) -> Option<usize> {
        connectivity::shortest_path_length(&self.grid, self.spawn, self.reward)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.grid.rows().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let c = if Position::new(row, col) == self.spawn {
                    Cell::Spawn.to_char()
                } else {
                    cell.to_char()
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
