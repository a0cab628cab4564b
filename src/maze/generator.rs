//! Procedural maze generation
//!
//! Obstacles are placed one cell at a time. Every tentative placement is
//! followed by a reachability check from spawn to reward and reverted when it
//! would cut the path, so the connectivity invariant holds at every point of
//! generation.

use rand::Rng;
use tracing::debug;

use super::{Cell, Grid, Maze, ObstacleReport, Position, connectivity};
use crate::{Error, Result};

/// Smallest supported grid side
pub const MIN_GRID_SIZE: usize = 5;

/// Largest supported grid side
pub const MAX_GRID_SIZE: usize = 12;

/// Fraction of the grid area targeted for obstacles
pub const OBSTACLE_FRACTION: f64 = 0.30;

/// Fraction of the obstacles that become walls; the rest become dangers
pub const WALL_FRACTION: f64 = 0.80;

/// Sampling attempts per obstacle kind
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Target `(walls, dangers)` for a grid of side `size`
pub fn obstacle_targets(size: usize) -> (usize, usize) {
    let total = ((size * size) as f64 * OBSTACLE_FRACTION).round() as usize;
    let walls = (total as f64 * WALL_FRACTION).round() as usize;
    (walls, total - walls)
}

/// Generate a random maze of side `size`.
///
/// The reward lands in a uniformly chosen corner and the spawn in the
/// diagonally opposite one. Walls, then dangers, are sampled with independent
/// attempt caps; running out of attempts leaves a sparser maze and is not an
/// error.
///
/// # Errors
///
/// Returns [`Error::InvalidSize`] when `size` is outside
/// `MIN_GRID_SIZE..=MAX_GRID_SIZE`.
///
/// # Examples
///
/// ```
/// use qmaze::maze::generate;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let maze = generate(7, &mut rng)?;
/// assert!(maze.shortest_path_length().is_some());
/// # Ok::<(), qmaze::Error>(())
/// ```
pub fn generate<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Maze> {
    if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
        return Err(Error::InvalidSize { size });
    }

    let mut grid = Grid::new(size);

    let last = size - 1;
    let corners = [
        Position::new(0, 0),
        Position::new(0, last),
        Position::new(last, 0),
        Position::new(last, last),
    ];
    let reward = corners[rng.random_range(0..corners.len())];
    let spawn = reward.mirrored(size);
    grid.set(reward, Cell::Reward);

    let (wall_target, danger_target) = obstacle_targets(size);
    let walls_placed = place_obstacles(&mut grid, spawn, reward, Cell::Wall, wall_target, rng);
    let dangers_placed =
        place_obstacles(&mut grid, spawn, reward, Cell::Danger, danger_target, rng);

    let report = ObstacleReport {
        wall_target,
        danger_target,
        walls_placed,
        dangers_placed,
    };

    if !report.is_complete() {
        debug!(
            size,
            walls_placed,
            wall_target,
            dangers_placed,
            danger_target,
            "attempt cap reached before obstacle targets"
        );
    }

    Ok(Maze::from_parts(grid, spawn, reward, report))
}

fn place_obstacles<R: Rng + ?Sized>(
    grid: &mut Grid,
    spawn: Position,
    reward: Position,
    kind: Cell,
    target: usize,
    rng: &mut R,
) -> usize {
    let size = grid.size();
    let mut placed = 0;
    let mut attempts = 0;

    while placed < target && attempts < MAX_PLACEMENT_ATTEMPTS {
        let position = Position::new(rng.random_range(0..size), rng.random_range(0..size));

        if grid.get(position) == Cell::Air && position != spawn {
            grid.set(position, kind);
            if connectivity::is_connected(grid, spawn, reward) {
                placed += 1;
            } else {
                grid.set(position, Cell::Air);
            }
        }
        attempts += 1;
    }

    placed
}
