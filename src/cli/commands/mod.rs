//! Subcommands of the `qmaze` binary

pub mod evaluate;
pub mod play;
pub mod train;
