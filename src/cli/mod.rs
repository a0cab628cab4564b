//! CLI infrastructure for qmaze
//!
//! This module provides the command-line interface for training agents,
//! evaluating saved agents and playing in the terminal.

pub mod commands;
pub mod output;
