//! Tabular Q-learning in procedurally generated grid mazes
//!
//! This crate provides:
//! - Maze generation with a guaranteed walkable path from spawn to reward
//! - An ε-greedy Q-learning agent over a dense Q-table
//! - The episodic step function with its fixed reward scheme
//! - A training pipeline with composable observers
//! - Agent persistence behind a repository port
//! - The `qmaze` command line front-end

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod game;
pub mod maze;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use error::{Error, Result};
