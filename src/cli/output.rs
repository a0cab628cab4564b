//! Output formatting for CLI

use crate::{
    game::GameController,
    maze::{Cell, Position},
};

/// Marker for the agent on a rendered board
pub const AGENT_CHAR: char = '@';

/// Marker for air cells already visited this life
pub const VISITED_CHAR: char = '+';

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a ratio as a percentage with one decimal
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Draw the controller's maze with the agent and this life's trail.
///
/// Spawn is drawn as `S` unless the agent stands on it.
pub fn render_board(controller: &GameController) -> String {
    let maze = controller.maze();
    let mut board = String::with_capacity(maze.size() * (maze.size() + 1));

    for row in 0..maze.size() {
        for col in 0..maze.size() {
            let position = Position::new(row, col);
            let c = if position == controller.position() {
                AGENT_CHAR
            } else if position == maze.spawn() {
                Cell::Spawn.to_char()
            } else {
                match maze.cell(position) {
                    Cell::Air if controller.has_visited(position) => VISITED_CHAR,
                    cell => cell.to_char(),
                }
            };
            board.push(c);
        }
        board.push('\n');
    }
    board
}

/// One-line status shown under the board
pub fn render_status(controller: &GameController) -> String {
    format!(
        "mode: {} | episode: {} | steps: {} | reward: {:.1} | deaths: {} | successes: {}",
        controller.mode(),
        controller.episode_index(),
        controller.episode_steps(),
        controller.episode_reward(),
        controller.deaths(),
        controller.successes()
    )
}
