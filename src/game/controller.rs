//! Episode controller: the MDP transition function
//!
//! The controller owns the current maze, the learning agent and all episode
//! bookkeeping. Every call to [`GameController::step`] is one atomic
//! transition.

use std::collections::HashSet;

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use super::{
    episode::{EpisodeOutcome, EpisodeRecord, StepEvent, StepOutcome},
    mode::{GameMode, InputCommand},
};
use crate::{
    Error, Result,
    maze::{self, Action, Cell, Maze, Position},
    q_learning::QLearningAgent,
};

/// Penalty for bumping into a wall or the grid edge
pub const BUMP_PENALTY: f64 = -5.0;

/// Penalty for stepping onto a danger cell
pub const DANGER_PENALTY: f64 = -20.0;

/// Reward for reaching the goal cell
pub const GOAL_REWARD: f64 = 200.0;

/// Penalty for a move that resolves to the current cell or to a cell already
/// visited this life
pub const REVISIT_PENALTY: f64 = -5.0;

/// Penalty for an ordinary move onto a fresh cell
pub const MOVE_PENALTY: f64 = -2.0;

/// Maze, agent and episode state driven one step at a time
#[derive(Debug, Clone)]
pub struct GameController {
    maze: Maze,
    agent: QLearningAgent,
    /// Source for regenerated mazes on `reset`
    rng: StdRng,
    mode: GameMode,
    position: Position,
    visited: HashSet<Position>,
    episode_index: usize,
    episode_steps: usize,
    episode_reward: f64,
    deaths: usize,
    successes: usize,
    finished_episode: Option<EpisodeRecord>,
}

impl GameController {
    /// Create a controller in training mode with the agent at the maze spawn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when the agent's Q-table does
    /// not cover the maze.
    pub fn new(maze: Maze, agent: QLearningAgent) -> Result<Self> {
        if agent.grid_size() != maze.size() {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "agent Q-table covers a {0}x{0} grid but the maze is {1}x{1}",
                    agent.grid_size(),
                    maze.size()
                ),
            });
        }

        let spawn = maze.spawn();
        Ok(Self {
            maze,
            agent,
            rng: StdRng::from_rng(&mut rand::rng()),
            mode: GameMode::default(),
            position: spawn,
            visited: HashSet::from([spawn]),
            episode_index: 0,
            episode_steps: 0,
            episode_reward: 0.0,
            deaths: 0,
            successes: 0,
            finished_episode: None,
        })
    }

    /// Seed the random source used to regenerate mazes on `reset`
    pub fn with_maze_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Attempt a move and apply the resulting transition.
    ///
    /// Checks run in priority order: grid edge, wall, danger, reward, then an
    /// ordinary move. In manual mode the agent is never updated and no
    /// episode reward is tracked, but movement, deaths, successes and
    /// respawns behave identically.
    pub fn step(&mut self, action: Action) -> StepOutcome {
        let current = self.position;

        let Some(candidate) = current.step(action, self.maze.size()) else {
            return self.bump(action, StepEvent::OutOfBounds);
        };

        match self.maze.cell(candidate) {
            Cell::Wall => self.bump(action, StepEvent::Wall),
            Cell::Danger => {
                self.end_episode(action, candidate, DANGER_PENALTY, EpisodeOutcome::Death)
            }
            Cell::Reward => {
                self.end_episode(action, candidate, GOAL_REWARD, EpisodeOutcome::Success)
            }
            Cell::Air | Cell::Spawn => self.advance(action, candidate),
        }
    }

    /// Let the agent pick an action for the current position and apply it
    pub fn auto_move(&mut self) -> StepOutcome {
        let action = self.agent.select_action(self.position);
        self.step(action)
    }

    /// Dispatch a front-end command. Returns the step outcome for moves.
    pub fn handle_input(&mut self, command: InputCommand) -> Result<Option<StepOutcome>> {
        match command {
            InputCommand::ToggleMode => {
                self.toggle_mode();
                Ok(None)
            }
            InputCommand::Reset => {
                self.reset()?;
                Ok(None)
            }
            InputCommand::MoveUp
            | InputCommand::MoveLeft
            | InputCommand::MoveRight
            | InputCommand::MoveDown => Ok(command.action().map(|action| self.step(action))),
        }
    }

    /// Regenerate the maze and clear all episode and lifetime counters.
    ///
    /// The agent's Q-table is kept: learned values carry over to the new
    /// layout.
    pub fn reset(&mut self) -> Result<()> {
        self.maze = maze::generate(self.maze.size(), &mut self.rng)?;
        self.respawn();
        self.deaths = 0;
        self.successes = 0;
        self.episode_steps = 0;
        self.episode_reward = 0.0;
        self.episode_index = 0;
        self.finished_episode = None;
        debug!(
            spawn = %self.maze.spawn(),
            reward = %self.maze.reward(),
            "maze regenerated"
        );
        Ok(())
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        if mode != self.mode {
            info!(mode = %mode, "mode changed");
        }
        self.mode = mode;
    }

    /// Take the record of the most recently finished training episode
    pub fn take_finished_episode(&mut self) -> Option<EpisodeRecord> {
        self.finished_episode.take()
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn deaths(&self) -> usize {
        self.deaths
    }

    pub fn successes(&self) -> usize {
        self.successes
    }

    pub fn episode_index(&self) -> usize {
        self.episode_index
    }

    pub fn episode_steps(&self) -> usize {
        self.episode_steps
    }

    pub fn episode_reward(&self) -> f64 {
        self.episode_reward
    }

    pub fn has_visited(&self, position: Position) -> bool {
        self.visited.contains(&position)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    fn bump(&mut self, action: Action, event: StepEvent) -> StepOutcome {
        let reward = self.learn(action, BUMP_PENALTY, self.position);
        StepOutcome {
            position: self.position,
            terminated: false,
            event,
            reward,
        }
    }

    fn end_episode(
        &mut self,
        action: Action,
        candidate: Position,
        reward: f64,
        outcome: EpisodeOutcome,
    ) -> StepOutcome {
        let signal = self.learn(action, reward, candidate);

        if self.mode.is_training() {
            let record = EpisodeRecord {
                episode_index: self.episode_index,
                step_count: self.episode_steps,
                total_reward: self.episode_reward,
                outcome,
            };
            info!(
                episode = record.episode_index,
                steps = record.step_count,
                total_reward = record.total_reward,
                "Episode {}: {outcome}",
                record.episode_index
            );
            self.finished_episode = Some(record);
            self.episode_index += 1;
            self.episode_steps = 0;
            self.episode_reward = 0.0;
        }

        let event = match outcome {
            EpisodeOutcome::Death => {
                self.deaths += 1;
                StepEvent::Danger
            }
            EpisodeOutcome::Success => {
                self.successes += 1;
                StepEvent::Reward
            }
        };
        self.respawn();

        StepOutcome {
            position: self.position,
            terminated: true,
            event,
            reward: signal,
        }
    }

    fn advance(&mut self, action: Action, candidate: Position) -> StepOutcome {
        let (event, reward) = if candidate == self.position {
            (StepEvent::Stayed, self.learn(action, REVISIT_PENALTY, candidate))
        } else if self.visited.contains(&candidate) {
            (StepEvent::Revisited, self.learn(action, REVISIT_PENALTY, candidate))
        } else {
            // A fresh cell costs a penalty but is not fed to the agent
            let reward = self.mode.is_training().then(|| {
                self.episode_reward += MOVE_PENALTY;
                MOVE_PENALTY
            });
            (StepEvent::Moved, reward)
        };

        self.episode_steps += 1;
        self.position = candidate;
        self.visited.insert(candidate);

        StepOutcome {
            position: candidate,
            terminated: false,
            event,
            reward,
        }
    }

    /// Update the agent and the episode reward in training mode
    fn learn(&mut self, action: Action, reward: f64, next_state: Position) -> Option<f64> {
        if !self.mode.is_training() {
            return None;
        }
        self.agent.update(self.position, action, reward, next_state);
        self.episode_reward += reward;
        Some(reward)
    }

    fn respawn(&mut self) {
        let spawn = self.maze.spawn();
        self.position = spawn;
        self.visited.clear();
        self.visited.insert(spawn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = "\
        G....
        .#...
        ..X..
        .....
        ....S";

    fn controller() -> GameController {
        let maze = Maze::parse(LAYOUT).unwrap();
        let agent = QLearningAgent::new(5, 0.2, 0.9, 0.3).with_seed(1);
        GameController::new(maze, agent).unwrap().with_maze_seed(2)
    }

    #[test]
    fn test_rejects_mismatched_agent() {
        let maze = Maze::parse(LAYOUT).unwrap();
        let agent = QLearningAgent::new(6, 0.2, 0.9, 0.3);
        assert!(matches!(
            GameController::new(maze, agent),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_edge_bump_penalises_without_moving() {
        let mut game = controller();
        let outcome = game.step(Action::Down);

        assert_eq!(outcome.into_parts(), (Position::new(4, 4), false));
        assert_eq!(outcome.event, StepEvent::OutOfBounds);
        assert_eq!(game.episode_reward(), -5.0);
        assert_eq!(game.episode_steps(), 0);
        // Q = 0.2 * (-5 + 0.9 * 0 - 0)
        assert!((game.agent().q_value(Position::new(4, 4), Action::Down) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_revisit_penalty_updates_agent() {
        let mut game = controller();
        game.step(Action::Left);
        let outcome = game.step(Action::Right);

        assert_eq!(outcome.event, StepEvent::Revisited);
        assert_eq!(outcome.reward, Some(REVISIT_PENALTY));
        assert_eq!(game.episode_reward(), MOVE_PENALTY + REVISIT_PENALTY);
        assert!(game.agent().q_value(Position::new(4, 3), Action::Right) < 0.0);
        // The fresh move onto (4, 3) was not fed to the agent
        assert_eq!(game.agent().q_value(Position::new(4, 4), Action::Left), 0.0);
    }

    #[test]
    fn test_manual_mode_moves_without_learning() {
        let mut game = controller();
        game.set_mode(GameMode::Manual);

        game.step(Action::Down);
        let outcome = game.step(Action::Up);

        assert_eq!(outcome.position, Position::new(3, 4));
        assert_eq!(outcome.reward, None);
        assert_eq!(game.episode_reward(), 0.0);
        assert_eq!(game.episode_steps(), 1);
        assert_eq!(game.agent().q_table().visited_entries(), 0);
    }

    #[test]
    fn test_manual_danger_counts_death_without_record() {
        let mut game = controller();
        game.set_mode(GameMode::Manual);

        for action in [Action::Up, Action::Up, Action::Left] {
            game.step(action);
        }
        // (2, 3) -> (2, 2) is the danger cell
        let outcome = game.step(Action::Left);

        assert_eq!(outcome.into_parts(), (Position::new(4, 4), true));
        assert_eq!(game.deaths(), 1);
        assert_eq!(game.episode_index(), 0);
        assert!(game.take_finished_episode().is_none());
    }

    #[test]
    fn test_handle_input_toggles_mode() {
        let mut game = controller();
        assert_eq!(game.handle_input(InputCommand::ToggleMode).unwrap(), None);
        assert_eq!(game.mode(), GameMode::Manual);

        let outcome = game.handle_input(InputCommand::MoveUp).unwrap();
        assert_eq!(outcome.map(|o| o.position), Some(Position::new(3, 4)));
    }
}
