//! # Graphout CLI Module
//!
//! This module implements the CLI interface for Graphout.
//!
//! ## Available Commands
//!
//! - `formats` - List registered output formats
//! - `features` - List serializer features
//! - `check` - Test whether a format name is known
//! - `serialize` - Serialize a statement document

mod commands;

use clap::{Parser, Subcommand};
use graphout_core::{FormatRegistry, GraphoutError};
use std::path::PathBuf;

use crate::config::Config;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Graphout - statement serializer
///
/// Writes subject-predicate-object statements through any registered
/// output format.
#[derive(Parser, Debug)]
#[command(name = "graphout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (default: graphout.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long = "json", global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered output formats
    Formats,

    /// List serializer features
    Features,

    /// Exit successfully if the format name or alias is known
    Check {
        /// Format name or alias
        name: String,
    },

    /// Serialize a statement document
    Serialize {
        /// Path to the JSON statement document
        #[arg(short, long)]
        input: PathBuf,

        /// Write to a new file instead of stdout
        #[arg(short, long, conflicts_with = "append")]
        output: Option<PathBuf>,

        /// Append to an existing file instead of stdout
        #[arg(short, long)]
        append: Option<PathBuf>,

        /// Format name or alias
        #[arg(short, long)]
        format: Option<String>,

        /// Base location for relative output
        #[arg(short, long)]
        base: Option<String>,

        /// Feature setting as name=value (repeatable)
        #[arg(long = "feature", value_name = "NAME=VALUE")]
        features: Vec<String>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), GraphoutError> {
    let registry = FormatRegistry::with_builtin_formats();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Formats) => cmd_formats(&registry, json_mode),
        Some(Commands::Features) => cmd_features(json_mode),
        Some(Commands::Check { name }) => cmd_check(&registry, &name),
        Some(Commands::Serialize {
            input,
            output,
            append,
            format,
            base,
            features,
        }) => {
            let mut config = Config::discover(cli.config.as_deref())?;
            config.apply_overrides(format, base, &features)?;
            let target = match (output, append) {
                (Some(path), _) => OutputTarget::Path(path),
                (None, Some(path)) => OutputTarget::Append(path),
                (None, None) => OutputTarget::Stdout,
            };
            cmd_serialize(&registry, &config, &input, &target)
        }
        None => {
            // No subcommand - list formats by default
            cmd_formats(&registry, json_mode)
        }
    }
}
