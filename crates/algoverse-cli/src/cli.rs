//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AlgoVerse CLI - Generate algorithm teaching pages and extract code from
/// model responses.
#[derive(Debug, Parser)]
#[command(name = "algoverse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract the code file from a saved model response
    Extract(ExtractArgs),

    /// Generate, extract and write the page for one topic
    Make(MakeArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Raw response file, or `-` for stdin
    pub input: String,

    /// Topic name used for the output filename
    #[arg(short, long)]
    pub topic: String,

    /// Output directory
    #[arg(short, long, default_value = "generated")]
    pub out: PathBuf,

    /// Print the artifact instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Use the cleaned response when there is no code-file section
    #[arg(long)]
    pub fallback: bool,

    /// Replace unsafe characters in the topic instead of rejecting it
    #[arg(long)]
    pub sanitize: bool,

    /// Artifact extension, without the dot
    #[arg(long)]
    pub extension: Option<String>,
}

/// Arguments for the make command.
#[derive(Debug, Parser)]
pub struct MakeArgs {
    /// Algorithm name, e.g. BinarySearch
    pub topic: String,

    /// Configuration file (defaults to the user config if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the configured output directory
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}
