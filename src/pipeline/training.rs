//! Training pipeline driving a controller in training mode

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Result,
    game::{EpisodeOutcome, EpisodeRecord, GameController, GameMode},
    ports::Observer,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of agent moves to perform
    pub max_steps: usize,

    /// Stop early once this many episodes have finished
    pub max_episodes: Option<usize>,

    /// Regenerate the maze after every N finished episodes
    pub reset_every: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_steps: 10_000,
            max_episodes: None,
            reset_every: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Agent moves performed
    pub total_steps: usize,

    /// Episodes finished
    pub episodes: usize,

    /// Episodes ending on a danger cell
    pub deaths: usize,

    /// Episodes ending on the reward cell
    pub successes: usize,

    /// Successes divided by episodes
    pub success_rate: f64,

    /// Mean total reward per finished episode
    pub mean_episode_reward: f64,

    /// Mean step count per finished episode
    pub mean_episode_steps: f64,

    /// Number of maze regenerations during the run
    pub maze_resets: usize,
}

impl TrainingResult {
    fn from_tally(total_steps: usize, tally: &EpisodeTally, maze_resets: usize) -> Self {
        let ratio = |value: f64| {
            if tally.episodes > 0 {
                value / tally.episodes as f64
            } else {
                0.0
            }
        };

        Self {
            total_steps,
            episodes: tally.episodes,
            deaths: tally.deaths,
            successes: tally.successes,
            success_rate: ratio(tally.successes as f64),
            mean_episode_reward: ratio(tally.reward_sum),
            mean_episode_steps: ratio(tally.step_sum as f64),
            maze_resets,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

#[derive(Debug, Default)]
struct EpisodeTally {
    episodes: usize,
    deaths: usize,
    successes: usize,
    reward_sum: f64,
    step_sum: usize,
}

impl EpisodeTally {
    fn record(&mut self, record: &EpisodeRecord) {
        self.episodes += 1;
        self.reward_sum += record.total_reward;
        self.step_sum += record.step_count;
        match record.outcome {
            EpisodeOutcome::Death => self.deaths += 1,
            EpisodeOutcome::Success => self.successes += 1,
        }
    }
}

/// Headless training loop over a [`GameController`]
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run `auto_move` until the step budget or the episode cap is reached.
    ///
    /// The controller is switched to training mode first. Episode records
    /// handed to observers are numbered across maze resets, so indices keep
    /// increasing even though the controller restarts its own count.
    pub fn run(&mut self, controller: &mut GameController) -> Result<TrainingResult> {
        controller.set_mode(GameMode::Training);

        for observer in &mut self.observers {
            observer.on_training_start(self.config.max_steps)?;
        }

        let mut tally = EpisodeTally::default();
        let mut maze_resets = 0;
        let mut total_steps = 0;

        while total_steps < self.config.max_steps {
            if self
                .config
                .max_episodes
                .is_some_and(|cap| tally.episodes >= cap)
            {
                break;
            }

            let outcome = controller.auto_move();
            for observer in &mut self.observers {
                observer.on_step(total_steps, &outcome)?;
            }
            total_steps += 1;

            let Some(finished) = controller.take_finished_episode() else {
                continue;
            };
            let record = EpisodeRecord {
                episode_index: tally.episodes,
                ..finished
            };
            tally.record(&record);
            for observer in &mut self.observers {
                observer.on_episode_end(&record)?;
            }

            if let Some(interval) = self.config.reset_every
                && interval > 0
                && tally.episodes.is_multiple_of(interval)
            {
                controller.reset()?;
                maze_resets += 1;
                debug!(episodes = tally.episodes, "maze reset during training");
                for observer in &mut self.observers {
                    observer.on_maze_reset(tally.episodes)?;
                }
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult::from_tally(total_steps, &tally, maze_resets))
    }
}
