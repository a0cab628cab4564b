//! Breadth-first reachability over the maze grid

use std::collections::VecDeque;

use super::{Action, Grid, Position};

/// Length of the shortest 4-connected path from `from` to `to`, treating
/// walls and dangers as impassable.
///
/// Returns `None` when `to` cannot be reached.
pub fn shortest_path_length(grid: &Grid, from: Position, to: Position) -> Option<usize> {
    let size = grid.size();
    let mut visited = vec![false; size * size];
    let mut queue = VecDeque::new();

    visited[from.row * size + from.col] = true;
    queue.push_back((from, 0));

    while let Some((position, distance)) = queue.pop_front() {
        if position == to {
            return Some(distance);
        }

        for action in Action::ALL {
            let Some(next) = position.step(action, size) else {
                continue;
            };
            let idx = next.row * size + next.col;
            if !visited[idx] && grid.get(next).is_passable() {
                visited[idx] = true;
                queue.push_back((next, distance + 1));
            }
        }
    }

    None
}

/// Whether a walkable path links `from` to `to`
pub fn is_connected(grid: &Grid, from: Position, to: Position) -> bool {
    shortest_path_length(grid, from, to).is_some()
}
