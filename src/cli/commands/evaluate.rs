//! Evaluate command - Run a saved agent greedily on fresh mazes

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::debug;

use crate::{
    app::{App, GameConfig},
    cli::output::{format_percent, print_kv, print_section},
    game::{GameMode, StepEvent},
    q_learning::{QLearningAgent, TrainingMetadata},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent")]
pub struct EvaluateArgs {
    /// Path to a saved agent
    pub agent: PathBuf,

    /// Number of evaluation mazes
    #[arg(long, short = 'e', default_value_t = 20)]
    pub episodes: usize,

    /// Give up on a maze after this many moves
    #[arg(long, default_value_t = 200)]
    pub max_steps: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// How a single evaluation run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    Death,
    Timeout,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRun {
    pub outcome: RunOutcome,
    pub steps: usize,
    pub shortest_path: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub agent_file: String,
    pub grid_size: usize,
    pub episodes: usize,
    pub successes: usize,
    pub deaths: usize,
    pub timeouts: usize,
    pub success_rate: f64,
    /// Mean of shortest path length over steps taken, successful runs only
    pub path_efficiency: Option<f64>,
    pub trained: TrainingMetadata,
    pub runs: Vec<EvaluationRun>,
}

/// Play one greedy run per fresh maze without updating the agent.
///
/// Maze `i` uses `seed + i` when a seed is given.
pub fn evaluate_agent(
    app: &App,
    agent: &QLearningAgent,
    episodes: usize,
    max_steps: usize,
    seed: Option<u64>,
) -> Result<Vec<EvaluationRun>> {
    let greedy = agent.clone().with_exploration_rate(0.0);
    let mut runs = Vec::with_capacity(episodes);

    for episode in 0..episodes {
        let mut config = GameConfig::new(agent.grid_size());
        if let Some(seed) = seed {
            config = config.with_seed(seed.wrapping_add(episode as u64));
        }

        let mut controller = app.create_controller_with_agent(&config, greedy.clone())?;
        controller.set_mode(GameMode::Manual);
        let shortest_path = controller.maze().shortest_path_length();

        let mut run = EvaluationRun {
            outcome: RunOutcome::Timeout,
            steps: max_steps,
            shortest_path,
        };
        for step in 1..=max_steps {
            let outcome = controller.auto_move();
            if outcome.terminated {
                run.steps = step;
                run.outcome = match outcome.event {
                    StepEvent::Reward => RunOutcome::Success,
                    _ => RunOutcome::Death,
                };
                break;
            }
        }

        debug!(episode, outcome = ?run.outcome, steps = run.steps, "evaluation run finished");
        runs.push(run);
    }

    Ok(runs)
}

fn build_report(
    args: &EvaluateArgs,
    grid_size: usize,
    trained: TrainingMetadata,
    runs: Vec<EvaluationRun>,
) -> EvaluationReport {
    let count = |wanted: RunOutcome| runs.iter().filter(|run| run.outcome == wanted).count();
    let successes = count(RunOutcome::Success);

    let efficiencies: Vec<f64> = runs
        .iter()
        .filter(|run| run.outcome == RunOutcome::Success && run.steps > 0)
        .filter_map(|run| run.shortest_path.map(|best| best as f64 / run.steps as f64))
        .collect();

    EvaluationReport {
        agent_file: args.agent.display().to_string(),
        grid_size,
        episodes: runs.len(),
        successes,
        deaths: count(RunOutcome::Death),
        timeouts: count(RunOutcome::Timeout),
        success_rate: if runs.is_empty() {
            0.0
        } else {
            successes as f64 / runs.len() as f64
        },
        path_efficiency: (!efficiencies.is_empty())
            .then(|| efficiencies.iter().sum::<f64>() / efficiencies.len() as f64),
        trained,
        runs,
    }
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let app = App::new();

    println!("Loading trained agent from: {}", args.agent.display());
    let saved = app
        .load_saved_agent(&args.agent)
        .with_context(|| format!("failed to load agent from {}", args.agent.display()))?;
    let agent = saved.to_agent()?;

    print_section("Loaded Agent Info");
    print_kv("Maze", &format!("{0}x{0}", agent.grid_size()));
    if let Some(steps) = saved.metadata.steps_trained {
        print_kv("Steps trained", &steps.to_string());
    }
    if let Some(episodes) = saved.metadata.episodes_trained {
        print_kv("Episodes trained", &episodes.to_string());
    }
    print_kv("States visited", &agent.q_table().visited_entries().to_string());

    let runs = evaluate_agent(&app, &agent, args.episodes, args.max_steps, args.seed)?;
    let report = build_report(&args, agent.grid_size(), saved.metadata.clone(), runs);

    print_section("Evaluation Results");
    print_kv("Mazes", &report.episodes.to_string());
    print_kv(
        "Successes",
        &format!(
            "{} ({})",
            report.successes,
            format_percent(report.success_rate)
        ),
    );
    print_kv("Deaths", &report.deaths.to_string());
    print_kv("Timeouts", &report.timeouts.to_string());
    if let Some(efficiency) = report.path_efficiency {
        print_kv("Path efficiency", &format_percent(efficiency));
    }

    if let Some(export_path) = &args.export {
        let file = File::create(export_path)
            .with_context(|| format!("failed to create {}", export_path.display()))?;
        serde_json::to_writer_pretty(file, &report)?;
        println!("\n✓ Results exported to: {}", export_path.display());
    }

    Ok(())
}
