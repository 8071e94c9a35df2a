//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// podlink - pod to AI engine bridge
#[derive(Debug, Parser)]
#[command(
    name = "pl",
    about = "Deliver pod interpretations and data to the AI engine",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether the AI engine is ready
    Health,

    /// Import a pod's persisted interpretations and report the count
    Import {
        /// Pod name
        pod: String,
    },

    /// Import a pod's interpretations and send them to the AI engine
    Push {
        /// Pod name
        pod: String,
    },

    /// Seed and push every pod, then bootstrap all data connectors
    Start,
}
