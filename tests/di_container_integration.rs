//! Integration tests for dependency injection.
//!
//! The container is exercised with an in-memory repository and fixed seeds,
//! so these tests never touch the disk and always replay the same run.

use std::path::Path;

use qmaze::{
    adapters::{InMemoryRepository, MsgPackRepository},
    app::{App, GameConfig},
    maze::Position,
    pipeline::{TrainingConfig, TrainingPipeline},
    ports::AgentRepository,
    q_learning::{SavedAgent, TrainingMetadata},
};
use tempfile::tempdir;

fn train(app: &App, config: &GameConfig, steps: usize) -> qmaze::game::GameController {
    let mut controller = app.create_controller(config).unwrap();
    TrainingPipeline::new(TrainingConfig {
        max_steps: steps,
        ..TrainingConfig::default()
    })
    .run(&mut controller)
    .unwrap();
    controller
}

#[test]
fn test_app_with_in_memory_repository() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing()
        .with_repository(repo.clone())
        .with_default_seed(42)
        .build();

    let controller = train(&app, &GameConfig::new(6), 1_000);
    let path = Path::new("trained");
    app.save_agent(controller.agent(), TrainingMetadata::default(), path)
        .unwrap();
    assert!(repo.contains(path));

    let loaded = app.load_agent(path).unwrap();
    assert_eq!(loaded.q_table(), controller.agent().q_table());
}

#[test]
fn test_deterministic_training_with_seed() {
    let config = GameConfig::new(7).with_seed(42);

    let first = train(&App::for_testing().build(), &config, 2_000);
    let second = train(&App::for_testing().build(), &config, 2_000);

    assert_eq!(first.maze(), second.maze());
    assert_eq!(first.agent().q_table(), second.agent().q_table());
    assert_eq!(first.deaths(), second.deaths());
    assert_eq!(first.successes(), second.successes());
}

#[test]
fn test_resumed_agent_keeps_learned_values() {
    let app = App::for_testing()
        .with_repository(InMemoryRepository::new())
        .with_default_seed(5)
        .build();
    let config = GameConfig::new(5);

    let controller = train(&app, &config, 1_500);
    let spawn = controller.maze().spawn();
    let before = controller.agent().max_q(spawn);
    app.save_agent(controller.agent(), TrainingMetadata::default(), Path::new("a"))
        .unwrap();

    let agent = app.load_agent(Path::new("a")).unwrap();
    let resumed = app.create_controller_with_agent(&config, agent).unwrap();
    assert_eq!(resumed.agent().max_q(spawn), before);
}

#[test]
fn test_grid_mismatch_is_rejected() {
    let app = App::for_testing().with_default_seed(1).build();
    let agent = app.create_agent(&GameConfig::new(5)).unwrap();

    let result = app.create_controller_with_agent(&GameConfig::new(8), agent);
    assert!(matches!(
        result,
        Err(qmaze::Error::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_msgpack_file_round_trip() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("agent.msgpack");
    let app = App::for_testing().with_default_seed(3).build();

    let controller = train(&app, &GameConfig::new(6), 800);
    let metadata = TrainingMetadata {
        grid_size: Some(6),
        steps_trained: Some(800),
        ..TrainingMetadata::default()
    };
    app.save_agent(controller.agent(), metadata.clone(), &path)
        .unwrap();

    let saved: SavedAgent = MsgPackRepository::new().load(&path).unwrap();
    assert_eq!(saved.metadata, metadata);
    assert_eq!(saved.grid_size(), 6);
    assert_eq!(
        saved.to_agent().unwrap().q_value(Position::new(0, 0), qmaze::maze::Action::Up),
        controller.agent().q_value(Position::new(0, 0), qmaze::maze::Action::Up)
    );
}
