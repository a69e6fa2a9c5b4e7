//! Employee work log CLI library.
//!
//! This crate provides the `wl` command-line interface on top of the work log
//! store and the hours engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, EmployeeAction, LogAction};
pub use config::Config;
