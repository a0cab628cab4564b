//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training
//! driver to specific output formats or metrics.

use crate::{
    Result,
    game::{EpisodeRecord, StepOutcome},
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during
/// training, such as progress bars, JSONL exports of episode records or
/// running metrics.
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_steps)` - Once at the beginning
/// 2. For each agent move:
///    - `on_step(step_num, outcome)`
///    - `on_episode_end(record)` - When the move ended a training episode
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use qmaze::{game::EpisodeRecord, ports::Observer};
///
/// struct EpisodeCounter {
///     episodes: usize,
/// }
///
/// impl Observer for EpisodeCounter {
///     fn on_episode_end(&mut self, _record: &EpisodeRecord) -> qmaze::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// `total_steps` is the step budget of the run; the run may end earlier
    /// when an episode cap is reached.
    fn on_training_start(&mut self, _total_steps: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every agent move with the transition it produced.
    fn on_step(&mut self, _step_num: usize, _outcome: &StepOutcome) -> Result<()> {
        Ok(())
    }

    /// Called when a training episode ends on a danger or reward cell.
    fn on_episode_end(&mut self, _record: &EpisodeRecord) -> Result<()> {
        Ok(())
    }

    /// Called after the maze has been regenerated mid-run.
    fn on_maze_reset(&mut self, _episodes_completed: usize) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to finalize outputs, flush files, or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
