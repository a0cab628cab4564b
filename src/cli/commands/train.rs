//! Train command - Train a Q-learning agent on generated mazes

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::{AppBuilder, GameConfig},
    cli::output::{format_number, format_percent, print_kv, print_section},
    maze::{Cell, Maze},
    pipeline::{
        JsonlObserver, MetricsObserver, MetricsSummary, MilestoneObserver, ProgressObserver,
        TrainingConfig, TrainingPipeline, TrainingResult,
    },
    q_learning::TrainingMetadata,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingResult,
    metrics: MetricsSummary,
    hyperparameters: SummaryHyperparameters,
    maze: SummaryMaze,
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct SummaryHyperparameters {
    learning_rate: f64,
    discount_rate: f64,
    exploration_rate: f64,
}

#[derive(Debug, Serialize)]
struct SummaryMaze {
    size: usize,
    spawn: String,
    reward: String,
    walls: usize,
    dangers: usize,
    shortest_path: Option<usize>,
}

impl From<&Maze> for SummaryMaze {
    fn from(maze: &Maze) -> Self {
        Self {
            size: maze.size(),
            spawn: maze.spawn().to_string(),
            reward: maze.reward().to_string(),
            walls: maze.grid().count(Cell::Wall),
            dangers: maze.grid().count(Cell::Danger),
            shortest_path: maze.shortest_path_length(),
        }
    }
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name means a directory target
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent")]
pub struct TrainArgs {
    /// Side length of the square maze (5 to 12)
    #[arg(long, short = 'n', default_value_t = 7)]
    pub size: usize,

    /// Number of agent moves to perform
    #[arg(long, short = 's', default_value_t = 10_000)]
    pub steps: usize,

    /// Stop once this many episodes have finished
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Learning rate α
    #[arg(long, default_value_t = 0.2)]
    pub learning_rate: f64,

    /// Discount rate γ
    #[arg(long, default_value_t = 0.9)]
    pub discount: f64,

    /// Exploration rate ε
    #[arg(long, default_value_t = 0.3)]
    pub epsilon: f64,

    /// Regenerate the maze every N finished episodes
    #[arg(long)]
    pub reset_every: Option<usize>,

    /// Resume training from a saved agent
    #[arg(long)]
    pub agent: Option<PathBuf>,

    /// Output file for the trained agent
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional file for JSONL episode records
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    if args.reset_every == Some(0) {
        bail!("--reset-every must be at least 1");
    }

    let summary_target = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let mut builder = AppBuilder::new();
    if let Some(seed) = args.seed {
        builder = builder.with_default_seed(seed);
    }
    let app = builder.build();

    let config = GameConfig::new(args.size)
        .with_learning_rate(args.learning_rate)
        .with_discount_rate(args.discount)
        .with_exploration_rate(args.epsilon);
    config.validate()?;

    let (agent, prior) = match &args.agent {
        Some(path) => {
            let saved = app
                .load_saved_agent(path)
                .with_context(|| format!("failed to load agent from {}", path.display()))?;
            if saved.grid_size() != args.size {
                bail!(
                    "saved agent covers a {0}x{0} grid; pass --size {0} to resume it",
                    saved.grid_size()
                );
            }
            let agent = app.load_agent(path)?;
            (agent, saved.metadata)
        }
        None => (app.create_agent(&config)?, TrainingMetadata::default()),
    };

    let mut controller = app.create_controller_with_agent(&config, agent)?;

    print_section("Training Configuration");
    print_kv("Maze", &format!("{0}x{0}", args.size));
    print_kv("Steps", &format_number(args.steps));
    if let Some(episodes) = args.episodes {
        print_kv("Episode cap", &format_number(episodes));
    }
    print_kv(
        "Rates (α/γ/ε)",
        &format!(
            "{}/{}/{}",
            controller.agent().q_table().learning_rate(),
            controller.agent().q_table().discount_rate(),
            controller.agent().exploration_rate()
        ),
    );
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }
    if let Some(path) = &args.agent {
        print_kv("Resumed from", &path.display().to_string());
    }
    print!("\n{}", controller.maze());

    let training_config = TrainingConfig {
        max_steps: args.steps,
        max_episodes: args.episodes,
        reset_every: args.reset_every,
    };
    let mut pipeline = TrainingPipeline::new(training_config);

    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    pipeline = pipeline.with_observer(Box::new(Arc::clone(&metrics)));

    let milestones = Arc::new(Mutex::new(MilestoneObserver::new()));
    pipeline = pipeline.with_observer(Box::new(Arc::clone(&milestones)));

    if let Some(observations_path) = &args.observations {
        let jsonl_observer = JsonlObserver::new(observations_path).with_context(|| {
            format!(
                "failed to create observations file {}",
                observations_path.display()
            )
        })?;
        pipeline = pipeline.with_observer(Box::new(jsonl_observer));
    }

    let result = pipeline.run(&mut controller)?;
    drop(pipeline);

    print_section("Training Complete");
    print_kv("Steps", &format_number(result.total_steps));
    print_kv("Episodes", &format_number(result.episodes));
    print_kv(
        "Successes",
        &format!(
            "{} ({})",
            format_number(result.successes),
            format_percent(result.success_rate)
        ),
    );
    print_kv("Deaths", &format_number(result.deaths));
    print_kv("Mean reward", &format!("{:.2}", result.mean_episode_reward));
    print_kv("Mean length", &format!("{:.2}", result.mean_episode_steps));
    if result.maze_resets > 0 {
        print_kv("Maze resets", &format_number(result.maze_resets));
    }

    milestones
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .display_summary();

    if let Some(output) = &args.output {
        let metadata = TrainingMetadata {
            grid_size: Some(args.size),
            steps_trained: Some(prior.steps_trained.unwrap_or(0) + result.total_steps),
            episodes_trained: Some(prior.episodes_trained.unwrap_or(0) + result.episodes),
            deaths: Some(prior.deaths.unwrap_or(0) + result.deaths),
            successes: Some(prior.successes.unwrap_or(0) + result.successes),
            seed: args.seed.or(prior.seed),
        };
        app.save_agent(controller.agent(), metadata, output)
            .with_context(|| format!("failed to save agent to {}", output.display()))?;
        println!("\n✓ Agent saved to: {}", output.display());
    }

    if let Some((summary_path, normalized)) = summary_target {
        if normalized {
            println!(
                "\n⚠️  Normalizing summary path to {}",
                summary_path.display()
            );
        }

        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            metrics: metrics
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .summary(),
            training: result,
            hyperparameters: SummaryHyperparameters {
                learning_rate: controller.agent().q_table().learning_rate(),
                discount_rate: controller.agent().q_table().discount_rate(),
                exploration_rate: controller.agent().exploration_rate(),
            },
            maze: SummaryMaze::from(controller.maze()),
            seed: args.seed,
        };

        let file = File::create(&summary_path)
            .with_context(|| format!("failed to create {}", summary_path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("✓ Summary written to: {}", summary_path.display());
    }

    Ok(())
}
