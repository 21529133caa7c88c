//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Kotlin semantic highlighting and outline engine
#[derive(Parser, Debug)]
#[command(name = "ktlens")]
#[command(about = "Semantic highlighting and outline extraction for Kotlin files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Show verbose output including binder statistics
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute semantic highlighting ranges for a file
    Highlight {
        /// Path to the Kotlin file to analyze
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "json", value_enum)]
        format: OutputFormat,

        /// Print the parsed AST (for debugging)
        #[arg(long)]
        print_ast: bool,
    },
    /// Emit outline structure items for a file
    Outline {
        /// Path to the Kotlin file to analyze
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "json", value_enum)]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON - machine-readable output
    #[default]
    Json,
    /// Plain text - one entry per line
    Text,
}
