//! Grid mazes: cell types, coordinates, generation and reachability

pub mod cell;
pub mod connectivity;
pub mod generator;
pub mod grid;
pub mod position;

pub use cell::Cell;
pub use connectivity::{is_connected, shortest_path_length};
pub use generator::{
    MAX_GRID_SIZE, MAX_PLACEMENT_ATTEMPTS, MIN_GRID_SIZE, OBSTACLE_FRACTION, WALL_FRACTION,
    generate, obstacle_targets,
};
pub use grid::{Grid, Maze, ObstacleReport};
pub use position::{Action, Position};
