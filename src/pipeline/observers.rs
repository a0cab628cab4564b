//! Observer implementations for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the training loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    game::{EpisodeOutcome, EpisodeRecord, StepOutcome},
    ports::Observer,
};

/// Progress bar observer - Shows training progress in steps
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
    deaths: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
            deaths: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} X:{}", self.successes, self.deaths)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_steps: usize) -> Result<()> {
        let pb = ProgressBar::new(total_steps as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} steps (G:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_step(&mut self, step_num: usize, _outcome: &StepOutcome) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(step_num as u64 + 1);
        }
        Ok(())
    }

    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        match record.outcome {
            EpisodeOutcome::Success => self.successes += 1,
            EpisodeOutcome::Death => self.deaths += 1,
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks running episode statistics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    episodes: usize,
    successes: usize,
    deaths: usize,
    total_steps: usize,
    outcomes: Vec<EpisodeOutcome>,
    episode_rewards: Vec<f64>,
    episode_lengths: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of finished episodes that reached the reward cell
    pub fn success_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.successes as f64 / self.episodes as f64
        }
    }

    /// Success rate over the last `window` episodes
    pub fn recent_success_rate(&self, window: usize) -> f64 {
        let start = self.outcomes.len().saturating_sub(window);
        let recent = &self.outcomes[start..];
        if recent.is_empty() {
            return 0.0;
        }
        let wins = recent
            .iter()
            .filter(|&&outcome| outcome == EpisodeOutcome::Success)
            .count();
        wins as f64 / recent.len() as f64
    }

    pub fn avg_episode_reward(&self) -> f64 {
        if self.episode_rewards.is_empty() {
            0.0
        } else {
            self.episode_rewards.iter().sum::<f64>() / self.episode_rewards.len() as f64
        }
    }

    pub fn avg_episode_length(&self) -> f64 {
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            self.episode_lengths.iter().sum::<usize>() as f64 / self.episode_lengths.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_steps: self.total_steps,
            episodes: self.episodes,
            successes: self.successes,
            deaths: self.deaths,
            success_rate: self.success_rate(),
            avg_episode_reward: self.avg_episode_reward(),
            avg_episode_length: self.avg_episode_length(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_steps: usize,
    pub episodes: usize,
    pub successes: usize,
    pub deaths: usize,
    pub success_rate: f64,
    pub avg_episode_reward: f64,
    pub avg_episode_length: f64,
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, _step_num: usize, _outcome: &StepOutcome) -> Result<()> {
        self.total_steps += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        self.episodes += 1;
        match record.outcome {
            EpisodeOutcome::Success => self.successes += 1,
            EpisodeOutcome::Death => self.deaths += 1,
        }
        self.outcomes.push(record.outcome);
        self.episode_rewards.push(record.total_reward);
        self.episode_lengths.push(record.step_count);
        Ok(())
    }
}

/// JSONL observer - Writes one episode record per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Milestone observer - Tracks key learning achievements
///
/// Records the first episode that reached the reward cell and the last one
/// that ended on a danger cell. Once the last death precedes the latest
/// successes, the agent has stopped dying on the current maze.
#[derive(Debug, Default)]
pub struct MilestoneObserver {
    first_success: Option<usize>,
    last_death: Option<usize>,
    episodes: usize,
    maze_resets: usize,
}

impl MilestoneObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the first success milestone (if achieved)
    pub fn first_success(&self) -> Option<usize> {
        self.first_success
    }

    /// Get the last death milestone (if any deaths occurred)
    pub fn last_death(&self) -> Option<usize> {
        self.last_death
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Display milestone summary
    pub fn display_summary(&self) {
        println!("\n=== Learning Milestones ===");

        match self.first_success {
            Some(episode) => println!("  First success: Episode #{}", episode + 1),
            None => println!("  First success: Not achieved"),
        }

        match self.last_death {
            Some(episode) => {
                println!("  Last death: Episode #{}", episode + 1);
                let since = self.episodes.saturating_sub(episode + 1);
                println!("  Episodes since last death: {since}");
            }
            None => println!("  Last death: No deaths recorded"),
        }

        if self.maze_resets > 0 {
            println!("  Maze regenerations: {}", self.maze_resets);
        }
    }
}

impl Observer for MilestoneObserver {
    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        self.episodes += 1;
        match record.outcome {
            EpisodeOutcome::Success => {
                self.first_success.get_or_insert(record.episode_index);
            }
            EpisodeOutcome::Death => self.last_death = Some(record.episode_index),
        }
        Ok(())
    }

    fn on_maze_reset(&mut self, _episodes_completed: usize) -> Result<()> {
        self.maze_resets += 1;
        Ok(())
    }
}

/// Shared observer handle so callers can read results after the pipeline
/// has consumed its boxed observers.
impl<O: Observer> Observer for Arc<Mutex<O>> {
    fn on_training_start(&mut self, total_steps: usize) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_training_start(total_steps)
    }

    fn on_step(&mut self, step_num: usize, outcome: &StepOutcome) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_step(step_num, outcome)
    }

    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_episode_end(record)
    }

    fn on_maze_reset(&mut self, episodes_completed: usize) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_maze_reset(episodes_completed)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_training_end()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn record(episode_index: usize, outcome: EpisodeOutcome, total_reward: f64) -> EpisodeRecord {
        EpisodeRecord {
            episode_index,
            step_count: 4,
            total_reward,
            outcome,
        }
    }

    #[test]
    fn test_metrics_observer() {
        let mut observer = MetricsObserver::new();

        assert_eq!(observer.success_rate(), 0.0);

        observer
            .on_episode_end(&record(0, EpisodeOutcome::Success, 190.0))
            .unwrap();
        observer
            .on_episode_end(&record(1, EpisodeOutcome::Death, -30.0))
            .unwrap();
        observer
            .on_episode_end(&record(2, EpisodeOutcome::Success, 180.0))
            .unwrap();

        let summary = observer.summary();
        assert_eq!(summary.episodes, 3);
        assert_eq!(summary.successes, 2);
        assert_eq!(summary.deaths, 1);
        assert!((observer.success_rate() - 0.666).abs() < 0.01);
        assert!((observer.avg_episode_reward() - 113.333).abs() < 0.01);
        assert_eq!(observer.avg_episode_length(), 4.0);
        assert_eq!(observer.recent_success_rate(1), 1.0);
        assert_eq!(observer.recent_success_rate(2), 0.5);
    }

    #[test]
    fn test_milestone_observer() {
        let mut observer = MilestoneObserver::new();

        observer
            .on_episode_end(&record(0, EpisodeOutcome::Death, -25.0))
            .unwrap();
        assert_eq!(observer.last_death(), Some(0));
        assert_eq!(observer.first_success(), None);

        observer
            .on_episode_end(&record(1, EpisodeOutcome::Success, 190.0))
            .unwrap();
        observer
            .on_episode_end(&record(2, EpisodeOutcome::Death, -25.0))
            .unwrap();
        observer
            .on_episode_end(&record(3, EpisodeOutcome::Success, 195.0))
            .unwrap();

        assert_eq!(observer.first_success(), Some(1));
        assert_eq!(observer.last_death(), Some(2));
        assert_eq!(observer.episodes(), 4);
    }

    #[test]
    fn test_jsonl_observer_writes_one_record_per_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("episodes.jsonl");

        let mut observer = JsonlObserver::new(&path).unwrap();
        observer
            .on_episode_end(&record(0, EpisodeOutcome::Death, -22.0))
            .unwrap();
        observer
            .on_episode_end(&record(1, EpisodeOutcome::Success, 196.0))
            .unwrap();
        observer.on_training_end().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: EpisodeRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second, record(1, EpisodeOutcome::Success, 196.0));
        assert!(lines[0].contains("\"outcome\":\"death\""));
    }

    #[test]
    fn test_shared_observer_is_readable_after_use() {
        let shared = Arc::new(Mutex::new(MilestoneObserver::new()));
        let mut handle: Box<dyn Observer> = Box::new(shared.clone());

        handle
            .on_episode_end(&record(0, EpisodeOutcome::Success, 198.0))
            .unwrap();
        drop(handle);

        assert_eq!(shared.lock().unwrap().first_success(), Some(0));
    }
}
