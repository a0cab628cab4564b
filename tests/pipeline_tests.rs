//! Tests for the training pipeline and its observers

mod common;

use std::sync::{Arc, Mutex};

use common::{OPEN_LAYOUT, controller_for};
use qmaze::{
    Result,
    app::{App, GameConfig},
    game::{EpisodeRecord, StepOutcome},
    pipeline::{
        JsonlObserver, MetricsObserver, MilestoneObserver, Observer, TrainingConfig,
        TrainingPipeline,
    },
};
use tempfile::tempdir;

/// Records the order of observer callbacks
#[derive(Default)]
struct EventLog {
    events: Vec<String>,
}

impl Observer for EventLog {
    fn on_training_start(&mut self, total_steps: usize) -> Result<()> {
        self.events.push(format!("start {total_steps}"));
        Ok(())
    }

    fn on_step(&mut self, _step_num: usize, _outcome: &StepOutcome) -> Result<()> {
        self.events.push("step".to_string());
        Ok(())
    }

    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        self.events.push(format!("episode {}", record.episode_index));
        Ok(())
    }

    fn on_maze_reset(&mut self, episodes_completed: usize) -> Result<()> {
        self.events.push(format!("reset {episodes_completed}"));
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.events.push("end".to_string());
        Ok(())
    }
}

#[test]
fn observers_see_every_step_and_episode() {
    let mut controller = controller_for(OPEN_LAYOUT, 0.2, 0.3);
    let log = Arc::new(Mutex::new(EventLog::default()));
    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        max_steps: 500,
        ..TrainingConfig::default()
    })
    .with_observer(Box::new(Arc::clone(&log)))
    .with_observer(Box::new(Arc::clone(&metrics)));

    let result = pipeline.run(&mut controller).unwrap();

    let log = log.lock().unwrap();
    let events = &log.events;
    assert_eq!(events.first().map(String::as_str), Some("start 500"));
    assert_eq!(events.last().map(String::as_str), Some("end"));
    assert_eq!(events.iter().filter(|e| *e == "step").count(), 500);

    let episodes: Vec<&String> = events.iter().filter(|e| e.starts_with("episode")).collect();
    assert_eq!(episodes.len(), result.episodes);

    let summary = metrics.lock().unwrap().summary();
    assert_eq!(summary.total_steps, 500);
    assert_eq!(summary.episodes, result.episodes);
    assert_eq!(summary.successes + summary.deaths, result.episodes);
    assert_eq!(result.successes + result.deaths, result.episodes);
}

#[test]
fn maze_resets_follow_the_episode_interval() {
    let app = App::for_testing().with_default_seed(21).build();
    let mut controller = app
        .create_controller(&GameConfig::new(5).with_exploration_rate(1.0))
        .unwrap();
    let log = Arc::new(Mutex::new(EventLog::default()));

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        max_steps: 100_000,
        max_episodes: Some(6),
        reset_every: Some(2),
    })
    .with_observer(Box::new(Arc::clone(&log)));

    let result = pipeline.run(&mut controller).unwrap();

    assert_eq!(result.episodes, 6);
    assert_eq!(result.maze_resets, 3);

    let log = log.lock().unwrap();
    let events = &log.events;
    let milestones: Vec<&str> = events
        .iter()
        .filter(|e| !e.starts_with("step"))
        .map(String::as_str)
        .collect();
    assert_eq!(
        milestones,
        [
            "start 100000",
            "episode 0",
            "episode 1",
            "reset 2",
            "episode 2",
            "episode 3",
            "reset 4",
            "episode 4",
            "episode 5",
            "reset 6",
            "end",
        ]
    );
}

#[test]
fn jsonl_and_milestones_agree_with_result() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("episodes.jsonl");
    let mut controller = controller_for(OPEN_LAYOUT, 0.2, 0.3);
    let milestones = Arc::new(Mutex::new(MilestoneObserver::new()));

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        max_steps: 2_000,
        max_episodes: Some(25),
        reset_every: None,
    })
    .with_observer(Box::new(JsonlObserver::new(&path).unwrap()))
    .with_observer(Box::new(Arc::clone(&milestones)));

    let result = pipeline.run(&mut controller).unwrap();
    drop(pipeline);

    let records: Vec<EpisodeRecord> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), result.episodes);
    for (index, record) in records.iter().enumerate() {
        assert_eq!(record.episode_index, index);
    }

    let milestones = milestones.lock().unwrap();
    assert_eq!(milestones.episodes(), result.episodes);
    if result.successes > 0 {
        assert!(milestones.first_success().is_some());
    }
    if result.deaths > 0 {
        assert!(milestones.last_death().is_some());
    }
}

#[test]
fn training_result_round_trips_through_json() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("result.json");
    let mut controller = controller_for(OPEN_LAYOUT, 0.2, 0.3);

    let result = TrainingPipeline::new(TrainingConfig {
        max_steps: 300,
        ..TrainingConfig::default()
    })
    .run(&mut controller)
    .unwrap();

    result.save(&path).unwrap();
    let loaded = qmaze::pipeline::TrainingResult::load(&path).unwrap();
    assert_eq!(loaded.total_steps, 300);
    assert_eq!(loaded.episodes, result.episodes);
}
