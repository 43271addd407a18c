//! Command-line interface for the saga binary.

mod commands;
mod play;
mod serve;

pub use commands::{Cli, Commands};
pub use play::run_play;
pub use serve::run_serve;
