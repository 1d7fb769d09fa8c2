//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Content safety and configuration tooling for agentflow
#[derive(Parser, Debug)]
#[command(name = "agentflow", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify text with the content safety gate (reads stdin if TEXT is omitted)
    Check {
        text: Option<String>,
    },

    /// Redact PII from text (reads stdin if TEXT is omitted)
    Sanitize {
        text: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Show configuration file locations
        #[arg(long)]
        sources: bool,

        /// Only report configuration issues
        #[arg(long)]
        validate: bool,
    },

    /// Inspect persisted sessions
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// List unexpired session ids
    List,
    /// Print the messages of a session
    Show { id: String },
    /// Delete a session
    Delete { id: String },
}
