//! Common test utilities for the qmaze test suite.
#![allow(dead_code)]

use qmaze::{
    game::{GameController, StepOutcome},
    maze::{Action, Maze},
    q_learning::QLearningAgent,
};

/// Reward top-left, spawn bottom-right, one wall and one danger in between.
pub const OPEN_LAYOUT: &str = "\
    G....
    .#...
    ..X..
    .....
    ....S";

/// Reward top-right, spawn bottom-left, danger in the top-left corner.
pub const DANGER_CORNER_LAYOUT: &str = "\
    X...G
    .....
    .....
    .....
    S....";

/// Reward top-left, spawn bottom-right, a wall left of the cell above spawn.
pub const WALLED_LAYOUT: &str = "\
    G....
    .....
    .....
    ...#.
    ....S";

/// Build a training-mode controller over a text layout.
pub fn controller_for(layout: &str, learning_rate: f64, exploration_rate: f64) -> GameController {
    primed_controller(layout, learning_rate, exploration_rate, |_| {})
}

/// Like [`controller_for`], but lets the caller teach the agent before the
/// controller takes ownership of it.
pub fn primed_controller(
    layout: &str,
    learning_rate: f64,
    exploration_rate: f64,
    prime: impl FnOnce(&mut QLearningAgent),
) -> GameController {
    let maze = Maze::parse(layout).expect("test layout should parse");
    let mut agent =
        QLearningAgent::new(maze.size(), learning_rate, 0.9, exploration_rate).with_seed(7);
    prime(&mut agent);
    GameController::new(maze, agent)
        .expect("agent should match the maze")
        .with_maze_seed(11)
}

/// Apply a sequence of moves, returning the last outcome.
pub fn walk(controller: &mut GameController, actions: &[Action]) -> Option<StepOutcome> {
    actions.iter().map(|&action| controller.step(action)).last()
}
