//! Operating modes and the input commands accepted by the controller

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::maze::Action;

/// Whether the controller feeds transitions back to the agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Moves come from a human; nothing is learned
    Manual,
    /// Moves update the Q-table and episode bookkeeping
    #[default]
    Training,
}

impl GameMode {
    pub fn is_training(self) -> bool {
        matches!(self, GameMode::Training)
    }

    pub fn toggled(self) -> GameMode {
        match self {
            GameMode::Manual => GameMode::Training,
            GameMode::Training => GameMode::Manual,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameMode::Manual => "Manual",
            GameMode::Training => "Training",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Device-independent commands a front-end may send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCommand {
    MoveUp,
    MoveLeft,
    MoveRight,
    MoveDown,
    ToggleMode,
    Reset,
}

impl InputCommand {
    /// Map a key to a command: `w/a/s/d` move, `m` toggles the mode and `r`
    /// regenerates the maze.
    pub fn from_key(key: char) -> Option<InputCommand> {
        match key.to_ascii_lowercase() {
            'w' => Some(InputCommand::MoveUp),
            'a' => Some(InputCommand::MoveLeft),
            's' => Some(InputCommand::MoveDown),
            'd' => Some(InputCommand::MoveRight),
            'm' => Some(InputCommand::ToggleMode),
            'r' => Some(InputCommand::Reset),
            _ => None,
        }
    }

    /// The move requested by this command, if any
    pub fn action(self) -> Option<Action> {
        match self {
            InputCommand::MoveUp => Some(Action::Up),
            InputCommand::MoveLeft => Some(Action::Left),
            InputCommand::MoveRight => Some(Action::Right),
            InputCommand::MoveDown => Some(Action::Down),
            InputCommand::ToggleMode | InputCommand::Reset => None,
        }
    }
}
