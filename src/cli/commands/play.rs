//! Play command - Line-oriented terminal front-end
//!
//! Each input line is one command:
//! - `w`/`a`/`s`/`d` move the agent by hand
//! - `m` toggles between training and manual mode
//! - `r` regenerates the maze
//! - an empty line or a number `n` runs `n` agent moves (training mode only)
//! - `q` quits

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::{AppBuilder, GameConfig},
    cli::output::{render_board, render_status},
    game::{GameController, InputCommand},
    maze::Maze,
};

#[derive(Parser, Debug)]
#[command(about = "Play or watch the agent in the terminal")]
pub struct PlayArgs {
    /// Side length of the square maze (5 to 12)
    #[arg(long, short = 'n', default_value_t = 7)]
    pub size: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Load the maze from a text layout instead of generating one
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Start from a saved agent
    #[arg(long)]
    pub agent: Option<PathBuf>,
}

/// One parsed input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayCommand {
    Input(InputCommand),
    Auto(usize),
    Help,
    Quit,
}

impl PlayCommand {
    /// Parse a line; `None` for anything unrecognised
    pub fn parse(line: &str) -> Option<PlayCommand> {
        let line = line.trim();
        if line.is_empty() {
            return Some(PlayCommand::Auto(1));
        }
        if let Ok(count) = line.parse::<usize>() {
            return Some(PlayCommand::Auto(count));
        }

        let mut chars = line.chars();
        let key = chars.next()?;
        if chars.next().is_some() {
            return None;
        }

        match key.to_ascii_lowercase() {
            'q' => Some(PlayCommand::Quit),
            'h' | '?' => Some(PlayCommand::Help),
            other => InputCommand::from_key(other).map(PlayCommand::Input),
        }
    }
}

const HELP: &str = "w/a/s/d move | m toggle mode | r new maze | <enter> or n: agent moves | q quit";

fn draw<W: Write>(controller: &GameController, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    write!(out, "{}", render_board(controller))?;
    writeln!(out, "{}", render_status(controller))
}

fn report_episode<W: Write>(controller: &mut GameController, out: &mut W) -> io::Result<()> {
    if let Some(record) = controller.take_finished_episode() {
        writeln!(
            out,
            "Episode {}: {} after {} steps (reward {:.1})",
            record.episode_index, record.outcome, record.step_count, record.total_reward
        )?;
    }
    Ok(())
}

/// Drive a controller from line-oriented input until `q` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    controller: &mut GameController,
    input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "{HELP}")?;
    draw(controller, out)?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;

        match PlayCommand::parse(&line) {
            Some(PlayCommand::Quit) => break,
            Some(PlayCommand::Help) => writeln!(out, "{HELP}")?,
            Some(PlayCommand::Input(command)) => {
                if let Some(outcome) = controller.handle_input(command)?
                    && outcome.terminated
                {
                    writeln!(out, "{:?}! Back to spawn.", outcome.event)?;
                }
                report_episode(controller, out)?;
            }
            Some(PlayCommand::Auto(count)) => {
                if !controller.mode().is_training() {
                    writeln!(out, "Agent moves run in Training mode; press m to switch.")?;
                    continue;
                }
                for _ in 0..count {
                    controller.auto_move();
                    report_episode(controller, out)?;
                }
            }
            None => {
                writeln!(out, "Unknown command {:?}. {HELP}", line.trim())?;
                continue;
            }
        }

        draw(controller, out)?;
    }

    Ok(())
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let mut builder = AppBuilder::new();
    if let Some(seed) = args.seed {
        builder = builder.with_default_seed(seed);
    }
    let app = builder.build();

    let maze = match &args.layout {
        Some(path) => {
            let layout = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read layout {}", path.display()))?;
            Some(Maze::parse(&layout)?)
        }
        None => None,
    };
    let size = maze.as_ref().map_or(args.size, Maze::size);
    let config = GameConfig::new(size);

    let agent = match &args.agent {
        Some(path) => app
            .load_agent(path)
            .with_context(|| format!("failed to load agent from {}", path.display()))?,
        None => app.create_agent(&config)?,
    };

    let mut controller = match maze {
        Some(maze) => app.create_controller_for_maze(&config, maze, agent)?,
        None => app.create_controller_with_agent(&config, agent)?,
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(&mut controller, stdin.lock(), &mut stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{game::GameMode, maze::Position, q_learning::QLearningAgent};

    fn controller() -> GameController {
        let maze = Maze::parse(
            "G....
             .#...
             ..X..
             .....
             ....S",
        )
        .unwrap();
        let agent = QLearningAgent::new(5, 0.2, 0.9, 0.3).with_seed(1);
        GameController::new(maze, agent).unwrap().with_maze_seed(2)
    }

    #[test]
    fn parses_commands() {
        assert_eq!(PlayCommand::parse(""), Some(PlayCommand::Auto(1)));
        assert_eq!(PlayCommand::parse("25"), Some(PlayCommand::Auto(25)));
        assert_eq!(
            PlayCommand::parse("W"),
            Some(PlayCommand::Input(InputCommand::MoveUp))
        );
        assert_eq!(
            PlayCommand::parse("m"),
            Some(PlayCommand::Input(InputCommand::ToggleMode))
        );
        assert_eq!(PlayCommand::parse("q"), Some(PlayCommand::Quit));
        assert_eq!(PlayCommand::parse("x"), None);
        assert_eq!(PlayCommand::parse("wa"), None);
    }

    #[test]
    fn session_applies_moves_and_stops_at_quit() {
        let mut controller = controller();
        let input = "m\nw\nw\nq\nw\n".as_bytes();
        let mut out = Vec::new();

        run_session(&mut controller, input, &mut out).unwrap();

        assert_eq!(controller.mode(), GameMode::Manual);
        assert_eq!(controller.position(), Position::new(2, 4));
    }

    #[test]
    fn auto_moves_are_refused_in_manual_mode() {
        let mut controller = controller();
        controller.set_mode(GameMode::Manual);
        let mut out = Vec::new();

        run_session(&mut controller, "10\n".as_bytes(), &mut out).unwrap();

        assert_eq!(controller.position(), Position::new(4, 4));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("press m"));
    }
}
