//! Command-line interface definitions for dental-form

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the dental-form application
#[derive(Parser)]
#[command(name = "dental-form")]
#[command(version)]
#[command(about = "Assemble dental data page descriptions and export them as JSON", long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./dental-form.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for dental-form
#[derive(Subcommand)]
pub enum Commands {
    /// Write a dental-form.toml with default settings
    Init {
        /// Directory to write the configuration into
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,

        /// Directory exported files are written to
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Overwrite an existing dental-form.toml
        #[arg(short, long)]
        force: bool,
    },

    /// Edit a document interactively, one command per line
    Edit {
        /// Start from a previously exported JSON file
        #[arg(long, value_name = "FILE")]
        open: Option<PathBuf>,

        /// Output directory (overrides the configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing export files
        #[arg(short, long)]
        force: bool,
    },

    /// Replay a command script and export the result
    Apply {
        /// Script with one command per line
        script: PathBuf,

        /// Start from a previously exported JSON file
        #[arg(long, value_name = "FILE")]
        open: Option<PathBuf>,

        /// Output directory (overrides the configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing export files
        #[arg(short, long)]
        force: bool,
    },

    /// Check that a JSON file has the shape of an export
    Validate {
        /// Exported JSON file
        file: PathBuf,
    },

    /// List editable locations, toggles and groups
    Fields,
}
