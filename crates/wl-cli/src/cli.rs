//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{employee, log};

/// Employee work log.
///
/// Records when employees start and finish work and reports the hours they
/// worked, counting overlapping sessions once.
#[derive(Debug, Parser)]
#[command(name = "wl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage employees.
    #[command(subcommand)]
    Employee(EmployeeAction),

    /// Record and manage work log entries.
    #[command(subcommand)]
    Log(LogAction),

    /// Show total hours worked per employee.
    Hours {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Fill an empty database with demo employees and work logs.
    Seed,
}

/// Employee subcommands.
#[derive(Debug, Subcommand)]
pub enum EmployeeAction {
    /// Add a new employee.
    Add(employee::AddArgs),

    /// List all employees.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show one employee and their hours.
    Show {
        /// Employee ID.
        id: i64,
    },

    /// Change an employee's details.
    Edit(employee::EditArgs),

    /// Delete an employee and all of their work logs.
    Delete {
        /// Employee ID.
        id: i64,
    },
}

/// Work log subcommands.
#[derive(Debug, Subcommand)]
pub enum LogAction {
    /// Record a start or finish event.
    Add(log::AddArgs),

    /// List work log entries in time order.
    List {
        /// Only show entries for this employee.
        #[arg(long)]
        employee: Option<i64>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show one work log entry.
    Show {
        /// Work log ID.
        id: i64,
    },

    /// Change a work log entry.
    Edit(log::EditArgs),

    /// Delete a work log entry.
    Delete {
        /// Work log ID.
        id: i64,
    },
}
