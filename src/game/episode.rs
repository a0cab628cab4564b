//! Step results and episode records

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::maze::Position;

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    Death,
    Success,
}

impl fmt::Display for EpisodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeOutcome::Death => f.write_str("DEAD"),
            EpisodeOutcome::Success => f.write_str("SUCCESS"),
        }
    }
}

/// Summary emitted when a training episode ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode_index: usize,
    pub step_count: usize,
    pub total_reward: f64,
    pub outcome: EpisodeOutcome,
}

/// What happened when a move was attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepEvent {
    /// The move would leave the grid; the agent stays put
    OutOfBounds,
    /// The target cell is a wall; the agent stays put
    Wall,
    /// The agent stepped on a danger cell and respawned
    Danger,
    /// The agent reached the reward cell and respawned
    Reward,
    /// The move resolved to the current cell
    Stayed,
    /// The agent moved onto a cell already visited this life
    Revisited,
    /// The agent moved onto a fresh cell
    Moved,
}

/// Result of one call to `GameController::step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Agent position after the step (spawn after a terminal step)
    pub position: Position,
    /// Whether the step ended the episode
    pub terminated: bool,
    pub event: StepEvent,
    /// Reward signal applied in training mode; `None` in manual mode
    pub reward: Option<f64>,
}

impl StepOutcome {
    /// `(new_position, episode_terminated)`
    pub fn into_parts(self) -> (Position, bool) {
        (self.position, self.terminated)
    }
}
