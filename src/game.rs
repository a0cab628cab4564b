//! Episodic maze game: controller, modes, input commands and step results

pub mod controller;
pub mod episode;
pub mod mode;

pub use controller::{
    BUMP_PENALTY, DANGER_PENALTY, GOAL_REWARD, GameController, MOVE_PENALTY, REVISIT_PENALTY,
};
pub use episode::{EpisodeOutcome, EpisodeRecord, StepEvent, StepOutcome};
pub use mode::{GameMode, InputCommand};
