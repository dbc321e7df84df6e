use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "contentkit")]
#[command(version)]
#[command(about = "Inspect ContentKit content types, form schemas and stored content")]
#[command(long_about = "
contentkit reads content type and enumeration descriptors from the configured
content types directory (`content_types_dir`, default `content-types/`) and
works with them offline.

Global arguments can be used with any command:
  --verbose     Trace everything the libraries log
  --debug       Show debug logging
  --quiet       Suppress all output except errors
  --config      Read settings from this file instead of ./contentkit.*

Example usage:
  contentkit list                               # List content types
  contentkit schema blog.article                # Print the form schema
  contentkit check blog.article stored.json     # Validate stored content
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (toml, yaml, yml or json)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the content types directory
    #[arg(long, global = true, value_name = "DIR")]
    pub types_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// List the known content types, ordered by rank then display name
    List {
        /// Print the summaries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the form schema of a content type as JSON
    Schema {
        /// Content type id, e.g. `blog.article`
        content_type: String,

        /// Print compact single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Validate stored content (`[{"fieldName", "value"}]` JSON) against its content type
    Check {
        content_type: String,

        /// File holding the stored JSON content
        file: PathBuf,
    },
}
