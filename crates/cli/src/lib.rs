//! CLI tool for inspecting consistent hash rings.
//!
//! Provides commands for:
//! - Looking up the ranked nodes (and replicas) for a key
//! - Inspecting ring state and per-node ownership
//! - Benchmarking build and lookup performance

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
