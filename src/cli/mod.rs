//! CLI module - argument parsing, run configuration and interactive prompts

pub mod align;
mod args;
mod config;
mod prompts;

pub use args::{Cli, Commands};
pub use config::RunConfig;
pub use prompts::*;
